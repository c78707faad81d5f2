//! Directory walking backend
//!
//! Plain walks use walkdir and visit every file. With `respect_ignore` the
//! ignore crate is used instead so `.gitignore` rules and hidden entries are
//! honored.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options controlling traversal
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Sort directory entries by file name
    pub sort: bool,
    /// Follow symbolic links to directories
    pub follow_links: bool,
    /// Honor ignore files and skip hidden entries
    pub respect_ignore: bool,
}

/// A traversal error on some entry below the root
#[derive(Debug, Clone)]
pub struct WalkError {
    pub path: Option<PathBuf>,
    pub message: String,
}

/// One visited file, or an error the walk recovered from
pub type WalkEntry = Result<PathBuf, WalkError>;

/// Walk all files under `root`
pub fn walk_files(root: &Path, options: WalkOptions) -> Box<dyn Iterator<Item = WalkEntry>> {
    if options.respect_ignore {
        Box::new(walk_with_ignore(root, options))
    } else {
        Box::new(walk_all(root, options))
    }
}

fn walk_all(root: &Path, options: WalkOptions) -> impl Iterator<Item = WalkEntry> {
    let mut walker = WalkDir::new(root).follow_links(options.follow_links);
    if options.sort {
        walker = walker.sort_by_file_name();
    }

    walker.into_iter().filter_map(|entry| match entry {
        Ok(e) => {
            if is_file_like(e.file_type(), e.path()) {
                Some(Ok(e.into_path()))
            } else {
                None
            }
        }
        Err(err) => Some(Err(WalkError {
            path: err.path().map(Path::to_path_buf),
            message: err.to_string(),
        })),
    })
}

fn walk_with_ignore(root: &Path, options: WalkOptions) -> impl Iterator<Item = WalkEntry> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .follow_links(options.follow_links);

    if options.sort {
        builder.sort_by_file_name(|a, b| a.cmp(b));
    }

    builder.build().filter_map(|entry| match entry {
        Ok(e) => match e.file_type() {
            Some(ft) if is_file_like(ft, e.path()) => Some(Ok(e.into_path())),
            _ => None,
        },
        Err(err) => Some(Err(WalkError {
            path: ignore_error_path(&err),
            message: err.to_string(),
        })),
    })
}

/// Anything that is not a directory. Dangling symlinks are kept so that
/// reading them fails and gets reported.
fn is_file_like(file_type: std::fs::FileType, path: &Path) -> bool {
    if file_type.is_dir() {
        return false;
    }
    !(file_type.is_symlink() && path.is_dir())
}

/// Path carried by an ignore walk error, if any
fn ignore_error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            ignore_error_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(ignore_error_path),
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        _ => None,
    }
}
