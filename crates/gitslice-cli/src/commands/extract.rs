//! Extract command implementation.

use crate::cli::Cli;
use crate::error::add_extraction_context;
use crate::error::add_source_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use gitslice_core::ExtractOptions;
use gitslice_core::FetchOptions;
use gitslice_core::NoopProgress;
use gitslice_core::ProgressCallback;
use gitslice_core::Provider;
use gitslice_core::RepoSource;
use std::env;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

pub async fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let raw = cli.source.as_deref().context("SOURCE is required")?;
    let mut source = add_source_context(RepoSource::parse(raw))?;
    if let Some(reference) = &cli.reference {
        source = source.with_reference(reference.as_str());
    }

    let destination = default_destination(cli.dest.as_deref(), &source, cli.keep_folder_name);
    let options = ExtractOptions::new(destination, source.subpath.clone())
        .with_keep_folder_name(cli.keep_folder_name)
        .with_max_pending_writes(cli.max_pending_writes);

    let output_root = options.output_root();
    if !cli.force && !is_empty_dir(&output_root)? {
        bail!(
            "Destination '{}' is not empty\n\
             HINT: Use --force to extract into it anyway.",
            output_root.display()
        );
    }

    log::info!("extracting {source} into {}", output_root.display());

    let progress: Box<dyn ProgressCallback> =
        if !cli.quiet && !cli.json && CliProgress::should_show() {
            Box::new(CliProgress::new("Extracting"))
        } else {
            Box::new(NoopProgress)
        };

    let report = match &cli.archive {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open archive '{}'", path.display()))?;
            add_extraction_context(
                gitslice_core::extract_from_reader(BufReader::new(file), &options, progress).await,
                &source,
            )?
        }
        None => {
            let fetch = fetch_options(cli.token.as_deref(), source.provider);
            let stream = add_source_context(gitslice_core::fetch_archive(&source, &fetch).await)?;
            add_extraction_context(
                gitslice_core::extract_with_progress(stream, &options, progress).await,
                &source,
            )?
        }
    };

    formatter.format_extraction_result(&report, &output_root)?;

    Ok(())
}

/// Destination used when none is given: the requested folder name, or the
/// current directory when that folder is kept anyway.
fn default_destination(dest: Option<&Path>, source: &RepoSource, keep: bool) -> PathBuf {
    match dest {
        Some(dest) => dest.to_path_buf(),
        None if keep && !source.subpath.is_empty() => PathBuf::from("."),
        None => PathBuf::from(source.default_folder_name()),
    }
}

/// Provider-specific environment variable consulted when no token is given.
const fn token_var(provider: Provider) -> &'static str {
    match provider {
        Provider::GitHub => "GITHUB_TOKEN",
        Provider::GitLab => "GITLAB_TOKEN",
        Provider::Bitbucket => "BITBUCKET_TOKEN",
    }
}

fn fetch_options(token: Option<&str>, provider: Provider) -> FetchOptions {
    let token = token
        .map(str::to_string)
        .or_else(|| env::var(token_var(provider)).ok())
        .filter(|token| !token.is_empty());

    match token {
        Some(token) => FetchOptions::default().with_token(token),
        None => FetchOptions::default(),
    }
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    match fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => {
            Err(e).with_context(|| format!("Cannot use '{}' as destination", path.display()))
        }
    }
}
