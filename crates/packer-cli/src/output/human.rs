//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use super::formatter::PackSummary;
use anyhow::Result;
use console::Term;
use console::style;
use packer_core::Entry;
use packer_core::Field;
use packer_core::PipelineReport;
use packer_core::Source;
use packer_core::selection::label;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    /// "Load passphrase from env PACKER_PASS"; prompted values are not
    /// reported since the operator just typed them.
    fn source_line(field: Field, source: Source) -> Option<String> {
        match source {
            Source::Prompt => None,
            _ => Some(format!("Load {field} from {source}")),
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_pack_result(&self, summary: &PackSummary, report: &PipelineReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Archive created: {}",
                style("✓").green().bold(),
                summary.destination.display()
            ));
        } else {
            let _ = self.term.write_line(&format!(
                "Archive created: {}",
                summary.destination.display()
            ));
        }

        let _ = self
            .term
            .write_line(&format!("  Entries:      {}", summary.entries.len()));
        let _ = self.term.write_line(&format!(
            "  Input size:   {}",
            Self::format_size(summary.total_size)
        ));
        let _ = self.term.write_line(&format!(
            "  Archive size: {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            for name in &summary.entries {
                let _ = self.term.write_line(&format!("    {name}"));
            }
            let _ = self
                .term
                .write_line(&format!("  Stages:       {}", report.stages));
            let _ = self
                .term
                .write_line(&format!("  Duration:     {:?}", report.duration));
        }

        Ok(())
    }

    fn format_dry_run(&self, summary: &PackSummary, command: &str) -> Result<()> {
        // The command is the whole point of a dry run, so print it even
        // when quiet.
        if !self.quiet {
            let _ = self.err_term.write_line(&format!(
                "Would pack {} entries ({}) into {}:",
                summary.entries.len(),
                Self::format_size(summary.total_size),
                summary.destination.display()
            ));
        }
        self.term.write_line(command)?;
        Ok(())
    }

    fn format_inventory(&self, entries: &[&Entry]) -> Result<()> {
        let width = entries.len().to_string().len();
        for (i, entry) in entries.iter().enumerate() {
            let number = format!("{:>width$}", i + 1);
            if self.use_colors {
                let text = if entry.is_directory {
                    style(label(entry)).bold().to_string()
                } else {
                    label(entry)
                };
                self.term
                    .write_line(&format!("{}  {text}", style(number).dim()))?;
            } else {
                self.term
                    .write_line(&format!("{number}  {}", label(entry)))?;
            }
        }

        if self.verbose {
            let total: u64 = entries.iter().map(|e| e.size).sum();
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "Total: {} entries, {}",
                entries.len(),
                Self::format_size(total)
            ));
        }

        Ok(())
    }

    fn format_source(&self, field: Field, source: Source) {
        if self.quiet {
            return;
        }
        if let Some(line) = Self::source_line(field, source) {
            self.format_notice(&line);
        }
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }

    fn format_notice(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{}", style(message).dim()));
        } else {
            let _ = self.err_term.write_line(message);
        }
    }
}
