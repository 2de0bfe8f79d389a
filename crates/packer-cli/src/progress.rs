//! Spinner shown while the inventory is being sized.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use packer_core::Entry;
use packer_core::ScanProgress;
use std::time::Duration;

/// CLI spinner implementing `ScanProgress`.
///
/// Shows the running entry count and total size. Cleared when the scan
/// completes so it never overlaps the selection menu.
pub struct ScanSpinner {
    bar: ProgressBar,
    bytes_seen: u64,
}

impl ScanSpinner {
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg} {pos} entries ({prefix})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.set_prefix(humanize_bytes(0));
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar, bytes_seen: 0 }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Drop for ScanSpinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ScanProgress for ScanSpinner {
    fn on_entry(&mut self, entry: &Entry) {
        self.bytes_seen = self.bytes_seen.saturating_add(entry.size);
        self.bar.set_prefix(humanize_bytes(self.bytes_seen));
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
#[allow(clippy::cast_precision_loss)]
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
