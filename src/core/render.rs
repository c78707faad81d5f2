//! Renderer module
//!
//! Two jobs: the text written into combined files (header line and divider
//! blocks) and the run report printed to stdout (text, json, jsonl).

use colored::Colorize;

use crate::core::model::{FileOutcome, RunReport};

/// Width of every divider line
pub const DIVIDER_WIDTH: usize = 80;

/// Title line opening a combined file, followed by a blank line
pub fn render_header(label: &str) -> String {
    format!("--- Combined file for {} ---\n\n", label)
}

/// One divider block wrapping a source file's content
pub fn render_block(path: &str, content: &str) -> String {
    let heavy = "=".repeat(DIVIDER_WIDTH);
    let light = "-".repeat(DIVIDER_WIDTH);

    let mut block = String::with_capacity(content.len() + 4 * DIVIDER_WIDTH + path.len() + 16);
    block.push_str(&heavy);
    block.push('\n');
    block.push_str("File: ");
    block.push_str(path);
    block.push('\n');
    block.push_str(&light);
    block.push('\n');
    block.push_str(content);
    block.push('\n');
    block.push_str(&heavy);
    block.push_str("\n\n");
    block
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Jsonl,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "jsonl" => Ok(ReportFormat::Jsonl),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: ReportFormat,
    pub pretty: bool,
}

impl RenderConfig {
    #[cfg(test)]
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: ReportFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for run reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a report to a string
    pub fn render(&self, report: &RunReport) -> String {
        match self.config.format {
            ReportFormat::Text => self.render_text(report),
            ReportFormat::Json => self.render_json(report),
            ReportFormat::Jsonl => self.render_jsonl(report),
        }
    }

    /// Human summary: produced artifacts, then counters and failures
    fn render_text(&self, report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} Contents written to:\n", "Done!".green().bold()));
        for summary in &report.outputs {
            output.push_str(&format!(
                "   • {} ({} {})\n",
                summary.path,
                summary.blocks,
                if summary.blocks == 1 { "file" } else { "files" }
            ));
        }

        let counts = &report.counts;
        output.push_str(&format!(
            "\n{} written, {} skipped, {} failed, {} ignored\n",
            counts.written, counts.skipped, counts.failed, counts.ignored
        ));

        if report.has_failures() {
            output.push_str(&format!("\n{}\n", "Failed files:".yellow().bold()));
            for record in report.failures() {
                if let FileOutcome::Failed { error } = &record.outcome {
                    output.push_str(&format!("   ⚠️ {}: {}\n", record.path, error));
                }
            }
        }

        output
    }

    /// Render the whole report as one JSON document
    fn render_json(&self, report: &RunReport) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }

    /// Render one JSON object per file record
    fn render_jsonl(&self, report: &RunReport) -> String {
        report
            .files
            .iter()
            .filter_map(|record| {
                if self.config.pretty {
                    serde_json::to_string_pretty(record).ok()
                } else {
                    serde_json::to_string(record).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }
}
