//! Path normalization utilities
//!
//! Paths written into combined files use '/' as separator and are shown
//! relative to the walk root, prefixed with `./`.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Path as it appears on a `File:` line
pub fn display_path(path: &Path, root: &Path) -> String {
    match make_relative(path, root) {
        Some(rel) if rel.is_empty() => ".".to_string(),
        Some(rel) => format!("./{}", rel),
        None => normalize_path(path),
    }
}

/// Resolve a mapping output against the output directory
pub fn resolve_output(out_dir: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() || out_dir == Path::new(".") {
        output.to_path_buf()
    } else {
        out_dir.join(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Path::new("src/main.rs");
        assert_eq!(normalize_path(path), "src/main.rs");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/project");
        let path = Path::new("/project/src/app.js");
        assert_eq!(make_relative(path, root), Some("src/app.js".to_string()));
    }

    #[test]
    fn test_make_relative_not_under_root() {
        let root = Path::new("/project");
        let path = Path::new("/other/file.js");
        assert_eq!(make_relative(path, root), None);
    }

    #[test]
    fn test_display_path_dot_root() {
        let root = Path::new(".");
        assert_eq!(display_path(Path::new("./a.js"), root), "./a.js");
        assert_eq!(
            display_path(Path::new("./static/css/b.css"), root),
            "./static/css/b.css"
        );
    }

    #[test]
    fn test_display_path_absolute_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            display_path(Path::new("/srv/site/index.html"), root),
            "./index.html"
        );
        assert_eq!(display_path(Path::new("/srv/site"), root), ".");
    }

    #[test]
    fn test_display_path_outside_root_falls_back() {
        let root = Path::new("/srv/site");
        assert_eq!(display_path(Path::new("/tmp/x.js"), root), "/tmp/x.js");
    }

    #[test]
    fn test_resolve_output() {
        assert_eq!(
            resolve_output(Path::new("."), Path::new("all_scripts_js.txt")),
            PathBuf::from("all_scripts_js.txt")
        );
        assert_eq!(
            resolve_output(Path::new("out"), Path::new("all_scripts_js.txt")),
            PathBuf::from("out/all_scripts_js.txt")
        );
        assert_eq!(
            resolve_output(Path::new("out"), Path::new("/abs/x.txt")),
            PathBuf::from("/abs/x.txt")
        );
    }
}
