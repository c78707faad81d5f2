//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::backends::aggregate::{run_aggregate, AggregateOptions};
use crate::backends::walk::WalkOptions;
use crate::core::file_reader::EncodingStrategy;
use crate::core::mapping::ExtensionMap;
use crate::core::render::{RenderConfig, ReportFormat};

/// extcat - concatenate source files into one combined text file per extension.
#[derive(Parser, Debug)]
#[command(name = "extcat")]
#[command(
    author,
    version,
    about,
    long_about = r#"extcat walks a directory tree and concatenates every file whose extension
is mapped into a combined text file for that extension.

Each combined file starts with a title line and holds one divider block per
source file:

    ================================================================================
    File: ./path/to/file.js
    --------------------------------------------------------------------------------
    <file content>
    ================================================================================

Outputs are overwritten on every run. Files that cannot be read are skipped with
a warning on stderr; the run itself still succeeds.

Default mapping:
    .js   -> all_scripts_js.txt
    .html -> all_scripts_html.txt
    .css  -> all_scripts_css.txt

Examples:
    extcat
    extcat --root site --out-dir build
    extcat --map ts=all_scripts_ts.txt --map tsx=all_scripts_ts.txt
    extcat --sort --format json
"#
)]
pub struct Cli {
    /// Root directory to walk.
    #[arg(
        long,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory to walk (defaults to the current directory).\n\n\
Paths on `File:` lines are shown relative to this root, prefixed with `./`."
    )]
    pub root: PathBuf,

    /// Directory the combined files are written to.
    #[arg(
        long,
        default_value = ".",
        value_name = "DIR",
        long_help = "Directory relative output paths are resolved against (defaults to the\n\
current directory). The directory must already exist."
    )]
    pub out_dir: PathBuf,

    /// Extension mapping entry (EXT=PATH), repeatable.
    #[arg(
        long = "map",
        value_name = "EXT=PATH",
        long_help = "Map a file extension to an output file. May be given several times;\n\
when present, the entries replace the default mapping entirely.\n\n\
Extensions are case-insensitive and the leading dot is optional.\n\
Several extensions may share one output.\n\n\
Example: --map js=all_scripts_js.txt --map mjs=all_scripts_js.txt"
    )]
    pub map: Vec<String>,

    /// Visit directory entries in file-name order.
    #[arg(
        long,
        long_help = "Sort directory entries by file name while walking. Without this flag the\n\
order is whatever the filesystem yields, which may differ between platforms."
    )]
    pub sort: bool,

    /// Follow symbolic links to directories.
    #[arg(long)]
    pub follow_links: bool,

    /// Honor .gitignore rules and skip hidden files.
    #[arg(
        long,
        long_help = "Respect .gitignore, .ignore and global git excludes, and skip hidden\n\
files and directories. By default every file under ROOT is visited."
    )]
    pub respect_ignore: bool,

    /// Handling of invalid UTF-8 (drop/replace).
    #[arg(
        long,
        default_value = "drop",
        value_parser = ["drop", "replace"],
        value_name = "MODE",
        long_help = "How to handle byte sequences that are not valid UTF-8.\n\n\
Supported values:\n\
- drop (default): remove them\n\
- replace: substitute U+FFFD"
    )]
    pub encoding: String,

    /// Report format (text/json/jsonl).
    #[arg(
        long,
        default_value = "text",
        value_parser = ["text", "json", "jsonl"],
        value_name = "FORMAT",
        long_help = "Select how the run report is printed to stdout.\n\n\
Supported values:\n\
- text (default): list of produced files and counters\n\
- json: the full report as one JSON document\n\
- jsonl: one JSON object per visited file"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (per-file diagnostics on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Install the stderr log subscriber
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .without_time()
        .try_init();
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    init_tracing(&cli);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: ReportFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let map = if cli.map.is_empty() {
        ExtensionMap::default()
    } else {
        ExtensionMap::from_entries(&cli.map).context("Invalid --map argument")?
    };

    let options = AggregateOptions {
        out_dir: cli.out_dir,
        walk: WalkOptions {
            sort: cli.sort,
            follow_links: cli.follow_links,
            respect_ignore: cli.respect_ignore,
        },
        encoding: cli.encoding.parse::<EncodingStrategy>().unwrap_or_default(),
    };

    run_aggregate(&cli.root, map, options, render_config)
        .with_context(|| format!("Failed to aggregate {}", cli.root.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["extcat"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.out_dir, PathBuf::from("."));
        assert!(cli.map.is_empty());
        assert_eq!(cli.encoding, "drop");
        assert_eq!(cli.format, "text");
        assert!(!cli.sort);
    }

    #[test]
    fn test_repeated_map() {
        let cli = Cli::try_parse_from([
            "extcat",
            "--map",
            "ts=a.txt",
            "--map",
            "tsx=a.txt",
            "--sort",
        ])
        .unwrap();
        assert_eq!(cli.map, vec!["ts=a.txt", "tsx=a.txt"]);
        assert!(cli.sort);
    }

    #[test]
    fn test_rejects_unknown_encoding() {
        assert!(Cli::try_parse_from(["extcat", "--encoding", "utf16"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["extcat", "--format", "jsn"]).is_err());
        let cli = Cli::try_parse_from(["extcat", "--format", "jsonl"]).unwrap();
        assert_eq!(cli.format, "jsonl");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["extcat", "-q", "-v"]).is_err());
    }
}
