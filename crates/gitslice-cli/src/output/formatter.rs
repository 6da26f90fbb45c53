//! Output formatter trait for CLI results.

use anyhow::Result;
use gitslice_core::ExtractionReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a completed extraction into `destination`
    fn format_extraction_result(&self, report: &ExtractionReport, destination: &Path)
    -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_omits_error() {
        let output = JsonOutput::success("extract", 42);
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(
            json,
            r#"{"operation":"extract","status":"success","data":42}"#
        );
    }

    #[test]
    fn test_error_omits_data() {
        let output = JsonOutput::error("extract", "no files found");
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(
            json,
            r#"{"operation":"extract","status":"error","error":"no files found"}"#
        );
    }
}
