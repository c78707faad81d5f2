//! Run Report Model
//!
//! Every file the aggregator looks at ends up as a typed `FileRecord`, and a
//! whole run is summarized by a `RunReport`. Renderers only ever see this model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop a run before or after the walk
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("root directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("cannot create output file {}: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot flush output file {}: {source}", .path.display())]
    FlushOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid mapping entry '{entry}': {reason}")]
    InvalidMapping { entry: String, reason: String },
}

/// Outcome of handling a single matching file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    /// A divider block was appended to the output
    Written {
        bytes: usize,
        /// Invalid UTF-8 was dropped or replaced while decoding
        #[serde(default)]
        lossy: bool,
    },
    /// The file was deliberately left out
    Skipped { reason: String },
    /// Reading or appending failed; the run carried on
    Failed { error: String },
}

impl FileOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        FileOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        FileOutcome::Failed {
            error: error.to_string(),
        }
    }
}

/// Per-file entry of the run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Display path, `./` followed by the path relative to root
    pub path: String,

    /// Lower-cased extension including the leading dot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Output artifact the file was routed to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, outcome: FileOutcome) -> Self {
        Self {
            path: path.into(),
            extension: None,
            output: None,
            outcome,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// One produced artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSummary {
    pub path: String,
    pub label: String,
    /// Number of divider blocks appended during the run
    pub blocks: usize,
}

/// Aggregate counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Files whose extension is absent or not mapped
    pub ignored: usize,
}

/// Everything that happened during one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub root: String,
    pub outputs: Vec<OutputSummary>,
    pub files: Vec<FileRecord>,
    pub counts: RunCounts,
}

impl RunReport {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Record a file and update the counters
    pub fn push(&mut self, record: FileRecord) {
        match record.outcome {
            FileOutcome::Written { .. } => self.counts.written += 1,
            FileOutcome::Skipped { .. } => self.counts.skipped += 1,
            FileOutcome::Failed { .. } => self.counts.failed += 1,
        }
        self.files.push(record);
    }

    pub fn record_ignored(&mut self) {
        self.counts.ignored += 1;
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileRecord> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.counts.failed > 0
    }
}
