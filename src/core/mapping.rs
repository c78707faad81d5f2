//! Extension-to-output mapping
//!
//! The mapping is a plain value handed to the aggregator. Keys are normalized
//! to a lower-cased extension with a leading dot; entries keep insertion order
//! so reports list outputs in the order they were configured.

use std::path::{Path, PathBuf};

use crate::core::model::AggregateError;

/// Prefix stripped from output file names when deriving a label
pub const LABEL_PREFIX: &str = "all_scripts_";

/// Suffix stripped from output file names when deriving a label
pub const LABEL_SUFFIX: &str = ".txt";

/// Ordered mapping from file extension to output path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMap {
    entries: Vec<(String, PathBuf)>,
}

impl Default for ExtensionMap {
    /// The scripts table: `.js`, `.html` and `.css`
    fn default() -> Self {
        let mut map = Self::new();
        map.insert(".js", "all_scripts_js.txt");
        map.insert(".html", "all_scripts_html.txt");
        map.insert(".css", "all_scripts_css.txt");
        map
    }
}

impl ExtensionMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a mapping from `EXT=PATH` entries
    pub fn from_entries<I, S>(entries: I) -> Result<Self, AggregateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for entry in entries {
            let (ext, output) = parse_entry(entry.as_ref())?;
            map.insert(ext, output);
        }
        Ok(map)
    }

    /// Map an extension to an output, replacing any previous target
    pub fn insert(&mut self, extension: impl AsRef<str>, output: impl Into<PathBuf>) {
        let key = normalize_extension(extension.as_ref());
        let output = output.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = output,
            None => self.entries.push((key, output)),
        }
    }

    /// Look up the output for an already-normalized extension
    pub fn output_for(&self, extension: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(k, _)| k == extension)
            .map(|(_, p)| p.as_path())
    }

    /// Distinct output paths, first occurrence wins the position
    pub fn outputs(&self) -> Vec<&Path> {
        let mut seen: Vec<&Path> = Vec::new();
        for (_, path) in &self.entries {
            if !seen.contains(&path.as_path()) {
                seen.push(path.as_path());
            }
        }
        seen
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lower-case an extension and make sure it carries a leading dot
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Extension of a file name: text after the last dot, lower-cased, dot included.
///
/// Leading dots do not start an extension, so `.js` and `..css` have none.
pub fn extension_of(file_name: &str) -> Option<String> {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let rest = &file_name[stem_start..];
    rest.rfind('.')
        .map(|idx| rest[idx..].to_lowercase())
        .filter(|ext| ext.len() > 1)
}

/// Header label for an output path (`all_scripts_js.txt` -> `JS`)
pub fn label_for(output: &Path) -> String {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_prefix(LABEL_PREFIX).unwrap_or(&name);
    let name = name.strip_suffix(LABEL_SUFFIX).unwrap_or(name);
    name.to_uppercase()
}

/// Parse an `EXT=PATH` mapping entry
pub fn parse_entry(entry: &str) -> Result<(String, PathBuf), AggregateError> {
    let invalid = |reason: &str| AggregateError::InvalidMapping {
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let (ext, output) = entry
        .split_once('=')
        .ok_or_else(|| invalid("expected EXT=PATH"))?;
    let ext = ext.trim();
    let output = output.trim();

    if ext.trim_start_matches('.').is_empty() {
        return Err(invalid("extension is empty"));
    }
    if ext.trim_start_matches('.').contains('.') {
        return Err(invalid("extension must not contain inner dots"));
    }
    if output.is_empty() {
        return Err(invalid("output path is empty"));
    }

    Ok((normalize_extension(ext), PathBuf::from(output)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let map = ExtensionMap::default();
        assert_eq!(map.len(), 3);
        assert_eq!(
            map.output_for(".js"),
            Some(Path::new("all_scripts_js.txt"))
        );
        assert_eq!(
            map.output_for(".html"),
            Some(Path::new("all_scripts_html.txt"))
        );
        assert_eq!(
            map.output_for(".css"),
            Some(Path::new("all_scripts_css.txt"))
        );
        assert_eq!(map.output_for(".rs"), None);
    }

    #[test]
    fn test_insert_normalizes_and_replaces() {
        let mut map = ExtensionMap::new();
        map.insert("TS", "a.txt");
        map.insert(".ts", "b.txt");
        assert_eq!(map.len(), 1);
        assert_eq!(map.output_for(".ts"), Some(Path::new("b.txt")));
    }

    #[test]
    fn test_outputs_are_distinct_and_ordered() {
        let mut map = ExtensionMap::new();
        map.insert(".htm", "all_scripts_html.txt");
        map.insert(".js", "all_scripts_js.txt");
        map.insert(".html", "all_scripts_html.txt");

        let outputs = map.outputs();
        assert_eq!(
            outputs,
            vec![
                Path::new("all_scripts_html.txt"),
                Path::new("all_scripts_js.txt")
            ]
        );
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.js"), Some(".js".to_string()));
        assert_eq!(extension_of("App.JS"), Some(".js".to_string()));
        assert_eq!(extension_of("bundle.min.css"), Some(".css".to_string()));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of(".js"), None);
        assert_eq!(extension_of("..css"), None);
        assert_eq!(extension_of(".eslintrc.js"), Some(".js".to_string()));
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_label_for() {
        assert_eq!(label_for(Path::new("all_scripts_js.txt")), "JS");
        assert_eq!(label_for(Path::new("out/all_scripts_html.txt")), "HTML");
        assert_eq!(label_for(Path::new("styles.txt")), "STYLES");
        assert_eq!(label_for(Path::new("combined.md")), "COMBINED.MD");
    }

    #[test]
    fn test_parse_entry() {
        let (ext, path) = parse_entry("TS=all_scripts_ts.txt").unwrap();
        assert_eq!(ext, ".ts");
        assert_eq!(path, PathBuf::from("all_scripts_ts.txt"));

        let (ext, _) = parse_entry(" .vue = views.txt ").unwrap();
        assert_eq!(ext, ".vue");
    }

    #[test]
    fn test_parse_entry_rejects_malformed() {
        assert!(parse_entry("js").is_err());
        assert!(parse_entry("=out.txt").is_err());
        assert!(parse_entry(".=out.txt").is_err());
        assert!(parse_entry("js=").is_err());
        assert!(parse_entry("min.js=out.txt").is_err());
    }

    #[test]
    fn test_from_entries() {
        let map = ExtensionMap::from_entries(["js=a.txt", "mjs=a.txt"]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.outputs().len(), 1);

        assert!(ExtensionMap::from_entries(["broken"]).is_err());
    }
}
