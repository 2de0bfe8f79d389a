//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::PackSummary;
use anyhow::Result;
use packer_core::Entry;
use packer_core::Field;
use packer_core::PipelineReport;
use packer_core::Source;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct PackOutput<'a> {
    #[serde(flatten)]
    summary: &'a PackSummary,
    bytes_written: u64,
    stages: usize,
    duration_ms: u128,
}

#[derive(Serialize)]
struct DryRunOutput<'a> {
    #[serde(flatten)]
    summary: &'a PackSummary,
    command: &'a str,
}

#[derive(Serialize)]
struct InventoryItem<'a> {
    number: usize,
    name: &'a str,
    path: String,
    size: u64,
    is_directory: bool,
}

impl OutputFormatter for JsonFormatter {
    fn format_pack_result(&self, summary: &PackSummary, report: &PipelineReport) -> Result<()> {
        let data = PackOutput {
            summary,
            bytes_written: report.bytes_written,
            stages: report.stages,
            duration_ms: report.duration.as_millis(),
        };
        Self::output(&JsonOutput::success("pack", data))
    }

    fn format_dry_run(&self, summary: &PackSummary, command: &str) -> Result<()> {
        let data = DryRunOutput { summary, command };
        Self::output(&JsonOutput::success("dry-run", data))
    }

    fn format_inventory(&self, entries: &[&Entry]) -> Result<()> {
        let data: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| InventoryItem {
                number: i + 1,
                name: &e.name,
                path: e.path.display().to_string(),
                size: e.size,
                is_directory: e.is_directory,
            })
            .collect();
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_source(&self, _field: Field, _source: Source) {}

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("pack", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput::success("warning", WarningData { message });
        let _ = Self::output(&output);
    }

    fn format_notice(&self, _message: &str) {}
}
