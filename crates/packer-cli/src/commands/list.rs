//! `--list`: print the numbered entries `--select` refers to.

use crate::cli::Cli;
use crate::error::add_packer_context;
use crate::output::OutputFormatter;
use crate::progress::ScanSpinner;
use anyhow::Result;
use packer_core::Inventory;
use packer_core::ScanProgress;
use packer_core::inventory::NoScanProgress;
use packer_core::selection::Choices;

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let dir = cli.source_directory();
    let mut progress: Box<dyn ScanProgress> = if show_progress {
        Box::new(ScanSpinner::new("Scanning"))
    } else {
        Box::new(NoScanProgress)
    };
    let inventory = add_packer_context(Inventory::scan_with_progress(&dir, &mut *progress))?;
    drop(progress);

    for warning in &inventory.warnings {
        formatter.format_warning(&warning.to_string());
    }

    let choices = Choices::new(&inventory.entries, cli.include_hidden);
    let shown: Vec<_> = choices
        .positions()
        .iter()
        .map(|&i| &inventory.entries[i])
        .collect();
    formatter.format_inventory(&shown)
}
