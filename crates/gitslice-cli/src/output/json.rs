//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use gitslice_core::ExtractionReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct ExtractionOutput {
    destination: String,
    files_extracted: usize,
    directories_created: usize,
    bytes_written: u64,
    entries_skipped: usize,
    archive_prefix: Option<String>,
    compression: Option<&'static str>,
    duration_ms: u128,
}

impl ExtractionOutput {
    fn new(report: &ExtractionReport, destination: &Path) -> Self {
        Self {
            destination: destination.display().to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            bytes_written: report.bytes_written,
            entries_skipped: report.entries_skipped,
            archive_prefix: report.archive_prefix.clone(),
            compression: report.compression.map(|codec| codec.name()),
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(
        &self,
        report: &ExtractionReport,
        destination: &Path,
    ) -> Result<()> {
        let output = JsonOutput::success("extract", ExtractionOutput::new(report, destination));
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("extract", format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
