//! extcat - concatenate source files into per-extension combined text files
//!
//! extcat provides:
//! - A recursive walk of a root directory (walkdir, or ignore-aware)
//! - Extension-to-output mapping with case-insensitive matching
//! - Divider-framed combined files, rewritten from scratch on every run
//! - A typed per-file run report (text/json/jsonl)

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
