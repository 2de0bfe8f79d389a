//! Output formatter trait for CLI results.

use anyhow::Result;
use packer_core::ArchiveRequest;
use packer_core::Entry;
use packer_core::Field;
use packer_core::PipelineReport;
use packer_core::Source;
use serde::Serialize;
use std::path::PathBuf;

/// What is about to be packed, captured before the request is consumed.
#[derive(Debug, Clone, Serialize)]
pub struct PackSummary {
    pub destination: PathBuf,
    pub entries: Vec<String>,
    pub total_size: u64,
}

impl PackSummary {
    pub fn from_request(request: &ArchiveRequest) -> Self {
        Self {
            destination: request.destination().to_path_buf(),
            entries: request
                .selected_entries()
                .iter()
                .map(|e| e.name.clone())
                .collect(),
            total_size: request.total_size(),
        }
    }
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of a finished pipeline
    fn format_pack_result(&self, summary: &PackSummary, report: &PipelineReport) -> Result<()>;

    /// Format the command a dry run would have executed
    fn format_dry_run(&self, summary: &PackSummary, command: &str) -> Result<()>;

    /// Format the numbered entries offered for selection
    fn format_inventory(&self, entries: &[&Entry]) -> Result<()>;

    /// Report where a value came from; never receives the value itself
    fn format_source(&self, field: Field, source: Source);

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);

    /// Format an informational message
    fn format_notice(&self, message: &str);
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
