//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use gitslice_core::ExtractionReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

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

    fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut result = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(
        &self,
        report: &ExtractionReport,
        destination: &Path,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.line(&format!(
                "{} Extraction complete: {}",
                style("✓").green().bold(),
                destination.display()
            ));
        } else {
            self.line(&format!("Extraction complete: {}", destination.display()));
        }

        self.line(&format!(
            "  Files extracted: {}",
            Self::format_number(report.files_extracted)
        ));
        self.line(&format!(
            "  Directories:     {}",
            Self::format_number(report.directories_created)
        ));
        self.line(&format!(
            "  Total size:      {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            self.line(&format!(
                "  Entries skipped: {}",
                Self::format_number(report.entries_skipped)
            ));
            if let Some(prefix) = &report.archive_prefix {
                self.line(&format!("  Archive root:    {prefix}"));
            }
            self.line(&format!(
                "  Compression:     {}",
                report.compression.map_or("none", |codec| codec.name())
            ));
            self.line(&format!("  Duration:        {:?}", report.duration));
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Errors go to stderr, even in quiet mode
        let term = Term::stderr();
        let _ = if self.use_colors {
            term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()))
        } else {
            term.write_line(&format!("ERROR: {error:?}"))
        };
    }
}
