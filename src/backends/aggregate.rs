//! Aggregation backend
//!
//! Truncates every output to its header, walks the root once and appends a
//! divider block per matching file. A failure on one file is recorded in the
//! report and logged; it never stops the run.

use anyhow::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backends::walk::{walk_files, WalkEntry, WalkOptions};
use crate::core::file_reader::{read_source, EncodingStrategy};
use crate::core::mapping::{extension_of, label_for, ExtensionMap};
use crate::core::model::{AggregateError, FileOutcome, FileRecord, OutputSummary, RunReport};
use crate::core::paths::{display_path, normalize_path, resolve_output};
use crate::core::render::{render_block, render_header, RenderConfig, Renderer};

/// Options for an aggregation run
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Directory relative output paths are resolved against
    pub out_dir: PathBuf,
    pub walk: WalkOptions,
    pub encoding: EncodingStrategy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            walk: WalkOptions::default(),
            encoding: EncodingStrategy::default(),
        }
    }
}

/// An open output artifact
struct OutputSink {
    path: PathBuf,
    label: String,
    writer: BufWriter<File>,
    blocks: usize,
}

/// Outputs opened by `Aggregator::initialize`
pub struct OutputSet {
    sinks: Vec<OutputSink>,
    /// Mapping output path -> index into `sinks`
    index: HashMap<PathBuf, usize>,
}

impl OutputSet {
    fn sink_for(&mut self, output: &Path) -> Option<&mut OutputSink> {
        let idx = *self.index.get(output)?;
        self.sinks.get_mut(idx)
    }

    /// Resolved paths of every output, in mapping order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sinks.iter().map(|s| s.path.as_path())
    }

    /// Flush and close all outputs
    fn finish(self) -> Result<Vec<OutputSummary>, AggregateError> {
        let mut summaries = Vec::with_capacity(self.sinks.len());
        for mut sink in self.sinks {
            sink.writer
                .flush()
                .map_err(|source| AggregateError::FlushOutput {
                    path: sink.path.clone(),
                    source,
                })?;
            summaries.push(OutputSummary {
                path: normalize_path(&sink.path),
                label: sink.label,
                blocks: sink.blocks,
            });
        }
        Ok(summaries)
    }
}

/// Walks a root and concatenates mapped files into their outputs
pub struct Aggregator {
    map: ExtensionMap,
    options: AggregateOptions,
}

impl Aggregator {
    pub fn new(map: ExtensionMap, options: AggregateOptions) -> Self {
        Self { map, options }
    }

    /// Create or truncate every distinct output and write its header
    pub fn initialize(&self) -> Result<OutputSet, AggregateError> {
        let mut sinks = Vec::new();
        let mut index = HashMap::new();

        for output in self.map.outputs() {
            let path = resolve_output(&self.options.out_dir, output);
            let create_err = |source| AggregateError::CreateOutput {
                path: path.clone(),
                source,
            };

            let file = File::create(&path).map_err(create_err)?;
            let label = label_for(output);
            let mut writer = BufWriter::new(file);
            writer
                .write_all(render_header(&label).as_bytes())
                .map_err(create_err)?;

            index.insert(output.to_path_buf(), sinks.len());
            sinks.push(OutputSink {
                path,
                label,
                writer,
                blocks: 0,
            });
        }

        Ok(OutputSet { sinks, index })
    }

    /// Aggregate every mapped file under `root`
    pub fn run(&self, root: &Path) -> Result<RunReport, AggregateError> {
        if !root.exists() {
            return Err(AggregateError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(AggregateError::RootNotDirectory(root.to_path_buf()));
        }

        let mut outputs = self.initialize()?;
        let own_outputs: Vec<PathBuf> = outputs
            .paths()
            .filter_map(|p| p.canonicalize().ok())
            .collect();

        info!(root = %root.display(), outputs = own_outputs.len(), "starting aggregation");

        let mut report = RunReport::new(normalize_path(root));
        for entry in walk_files(root, self.options.walk) {
            self.visit(root, entry, &own_outputs, &mut outputs, &mut report);
        }

        report.outputs = outputs.finish()?;
        info!(
            written = report.counts.written,
            skipped = report.counts.skipped,
            failed = report.counts.failed,
            "aggregation finished"
        );
        Ok(report)
    }

    fn visit(
        &self,
        root: &Path,
        entry: WalkEntry,
        own_outputs: &[PathBuf],
        outputs: &mut OutputSet,
        report: &mut RunReport,
    ) {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                let shown = err
                    .path
                    .as_deref()
                    .map(|p| display_path(p, root))
                    .unwrap_or_else(|| display_path(root, root));
                warn!(path = %shown, error = %err.message, "Skipping unreadable entry");
                report.push(FileRecord::new(shown, FileOutcome::failed(err.message)));
                return;
            }
        };

        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return,
        };
        let Some(extension) = extension_of(&file_name) else {
            report.record_ignored();
            return;
        };
        let Some(output) = self.map.output_for(&extension) else {
            report.record_ignored();
            return;
        };

        let shown = display_path(&path, root);
        let outcome = if is_own_output(&path, own_outputs) {
            debug!(path = %shown, "Skipping output artifact found under root");
            FileOutcome::skipped("file is an output of this run")
        } else {
            match self.append(&path, &shown, output, outputs) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(path = %shown, error = %e, "Skipping file");
                    FileOutcome::failed(e)
                }
            }
        };

        report.push(
            FileRecord::new(shown, outcome)
                .with_extension(extension)
                .with_output(normalize_path(output)),
        );
    }

    /// Read one file and append its divider block to the mapped output
    fn append(
        &self,
        path: &Path,
        shown: &str,
        output: &Path,
        outputs: &mut OutputSet,
    ) -> std::io::Result<FileOutcome> {
        let text = read_source(path, self.options.encoding)?;
        if text.lossy {
            debug!(path = %shown, "invalid UTF-8 in source file");
        }

        let sink = outputs.sink_for(output).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no open output for {}", output.display()),
            )
        })?;

        // a failure partway through can leave a partial block in the output
        sink.writer
            .write_all(render_block(shown, &text.content).as_bytes())?;
        sink.blocks += 1;
        debug!(path = %shown, output = %sink.path.display(), "appended");

        Ok(FileOutcome::Written {
            bytes: text.content.len(),
            lossy: text.lossy,
        })
    }
}

fn is_own_output(path: &Path, own_outputs: &[PathBuf]) -> bool {
    if own_outputs.is_empty() {
        return false;
    }
    path.canonicalize()
        .map(|p| own_outputs.contains(&p))
        .unwrap_or(false)
}

/// Run the aggregate command and print the report
pub fn run_aggregate(
    root: &Path,
    map: ExtensionMap,
    options: AggregateOptions,
    render_config: RenderConfig,
) -> Result<()> {
    let aggregator = Aggregator::new(map, options);
    let report = aggregator.run(root)?;

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&report));

    Ok(())
}
