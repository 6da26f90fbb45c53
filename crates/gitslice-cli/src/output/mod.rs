//! Rendering of extraction reports and errors.
//!
//! `--json` selects a single JSON document on stdout. Otherwise results are
//! printed for a terminal, shortened by `--quiet` and extended by `--verbose`.

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use crate::cli::Cli;
use human::HumanFormatter;
use json::JsonFormatter;

/// Formatter selected by the output flags of `cli`.
pub fn create_formatter(cli: &Cli) -> Box<dyn OutputFormatter> {
    if cli.json {
        return Box::new(JsonFormatter);
    }
    Box::new(HumanFormatter::new(cli.verbose, cli.quiet))
}
