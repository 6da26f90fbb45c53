//! CLI argument parsing using clap.

use clap::Parser;
use clap_complete::Shell;
use gitslice_core::config::DEFAULT_MAX_PENDING_WRITES;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitslice")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "SOURCE forms:\n  \
    owner/repo[/path][#ref]\n  \
    github:owner/repo[/path][#ref]   (also gitlab:, bitbucket:)\n  \
    https://github.com/owner/repo/tree/<ref>/<path>")]
pub struct Cli {
    /// Repository and optional subdirectory to download
    #[arg(value_name = "SOURCE", required_unless_present = "completions")]
    pub source: Option<String>,

    /// Destination directory (default: last path segment or repository name)
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// Keep the requested folder as a directory inside DEST
    #[arg(short, long)]
    pub keep_folder_name: bool,

    /// Branch, tag or commit (overrides `#ref` in SOURCE)
    #[arg(short, long = "ref", value_name = "REF")]
    pub reference: Option<String>,

    /// Read the tarball from a local file instead of downloading it
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,

    /// Extract into a non-empty destination
    #[arg(short, long)]
    pub force: bool,

    /// Access token for private repositories [fallback: GITHUB_TOKEN, GITLAB_TOKEN, BITBUCKET_TOKEN]
    #[arg(long, env = "GITSLICE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Maximum number of file writes in flight
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_PENDING_WRITES)]
    pub max_pending_writes: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum, exclusive = true)]
    pub completions: Option<Shell>,
}
