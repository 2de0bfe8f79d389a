//! Default mode: resolve inputs, select entries, run the pipeline.

use crate::cli::Cli;
use crate::error::add_packer_context;
use crate::output::OutputFormatter;
use crate::output::PackSummary;
use crate::progress::ScanSpinner;
use crate::prompt::TerminalPrompter;
use anyhow::Result;
use packer_core::Entry;
use packer_core::Field;
use packer_core::InventoryWarning;
use packer_core::Pipeline;
use packer_core::PrepareObserver;
use packer_core::ProcessEnvironment;
use packer_core::ScanProgress;
use packer_core::Source;
use std::path::Path;

/// Forwards preparation events to the formatter and the scan spinner.
struct CliObserver<'a> {
    formatter: &'a dyn OutputFormatter,
    spinner: Option<ScanSpinner>,
    show_progress: bool,
}

impl ScanProgress for CliObserver<'_> {
    fn on_entry(&mut self, entry: &Entry) {
        if let Some(spinner) = &mut self.spinner {
            spinner.on_entry(entry);
        }
    }

    fn on_complete(&mut self) {
        // Dropping clears the line before the selection menu draws.
        self.spinner = None;
    }
}

impl PrepareObserver for CliObserver<'_> {
    fn on_resolved(&mut self, field: Field, source: Source) {
        self.formatter.format_source(field, source);
        // The scan starts right after the directory is settled.
        if field == Field::Directory && self.show_progress {
            self.spinner = Some(ScanSpinner::new("Scanning"));
        }
    }

    fn on_destination_adjusted(&mut self, destination: &Path) {
        self.formatter
            .format_notice(&format!("Output file: {}", destination.display()));
    }

    fn on_inventory_warning(&mut self, warning: &InventoryWarning) {
        self.formatter.format_warning(&warning.to_string());
    }
}

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let config = cli.packer_config();
    let mut prompter = TerminalPrompter::new(cli.select.clone());
    let mut observer = CliObserver {
        formatter,
        spinner: None,
        show_progress,
    };

    let request = add_packer_context(packer_core::prepare_request(
        &config,
        &ProcessEnvironment,
        &mut prompter,
        &mut observer,
    ))?;
    let summary = PackSummary::from_request(&request);

    if cli.dry_run {
        let pipeline = Pipeline::from_request(&request, &config.toolchain);
        return formatter.format_dry_run(&summary, &pipeline.render());
    }

    let report = add_packer_context(packer_core::pack(request, &config.toolchain))?;
    formatter.format_pack_result(&summary, &report)
}
