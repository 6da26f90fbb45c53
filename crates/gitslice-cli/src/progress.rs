//! Progress spinner for extraction.

use console::Term;
use gitslice_core::ProgressCallback;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;

/// CLI spinner implementing `ProgressCallback`.
///
/// The archive is decoded in one pass, so there is no total to show a bar
/// against. The spinner reports bytes written, the entry count and the
/// current entry path instead. Cleared on drop.
pub struct CliProgress {
    bar: ProgressBar,
    message: String,
    entries: usize,
}

impl CliProgress {
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();

        // Template: "⠋ [15.2 MiB] Extracting 42 entries: src/lib.rs"
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{bytes}] {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            message: message.to_string(),
            entries: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, path: &Path, current: usize) {
        self.entries = current;
        self.bar.set_message(format!(
            "{} {current} entries: {}",
            self.message,
            path.display()
        ));
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}
