//! gitslice - download a single directory of a Git repository.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use env_logger::Env;
use std::process::ExitCode;

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        "warn,gitslice_core=debug,gitslice=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if let Some(shell) = cli.completions {
        commands::completion::execute(shell);
        return ExitCode::SUCCESS;
    }

    init_logging(cli.verbose, cli.quiet);
    let formatter = output::create_formatter(&cli);

    match commands::extract::execute(&cli, &*formatter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}
