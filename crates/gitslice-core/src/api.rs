//! High-level public API for subdirectory extraction.

use std::io::Read;
use std::io::{self};
use std::time::Instant;

use bytes::Bytes;
use futures_util::Stream;
use tokio::runtime::Handle;
use tokio::task::JoinError;

use crate::ExtractOptions;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::extraction::EngineOutcome;
use crate::extraction::ExtractionEngine;
use crate::extraction::stream;

/// Extracts the subdirectory selected by `options` from an archive stream.
///
/// The stream carries an optionally compressed tar archive whose entries
/// share one provider-generated root directory. It is consumed exactly once,
/// front to back; only one chunk window and the content of one file at a
/// time are held in memory. The future resolves after every file write has
/// finished.
///
/// # Arguments
///
/// * `stream` - Archive bytes, for example from [`fetch_archive`](crate::fetch_archive)
/// * `options` - Destination, subpath and layout options
///
/// # Errors
///
/// Returns an error if:
/// - No entry lies below the requested subpath
/// - The stream fails or is not a valid archive
/// - A directory or file cannot be written
/// - An entry path would escape the destination
///
/// Files written before the failure are left in place.
///
/// # Examples
///
/// ```no_run
/// use bytes::Bytes;
/// use gitslice_core::ExtractOptions;
///
/// # async fn run() -> Result<(), gitslice_core::ExtractionError> {
/// let archive: Vec<u8> = std::fs::read("repo.tar.gz").unwrap();
/// let stream = futures_util::stream::iter([Ok::<_, std::io::Error>(Bytes::from(archive))]);
///
/// let options = ExtractOptions::new("./examples", "examples");
/// let report = gitslice_core::extract(stream, &options).await?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub async fn extract<S>(stream: S, options: &ExtractOptions) -> Result<ExtractionReport>
where
    S: Stream<Item = io::Result<Bytes>>,
{
    extract_with_progress(stream, options, NoopProgress).await
}

/// Extracts with progress reporting.
///
/// Same as [`extract`], additionally invoking `progress` for every
/// materialized entry. The callback runs on the decoding thread.
///
/// # Errors
///
/// See [`extract`].
pub async fn extract_with_progress<S, P>(
    stream: S,
    options: &ExtractOptions,
    mut progress: P,
) -> Result<ExtractionReport>
where
    S: Stream<Item = io::Result<Bytes>>,
    P: ProgressCallback + 'static,
{
    let start = Instant::now();
    let (tx, reader) = stream::channel(stream::DEFAULT_CHANNEL_CAPACITY);
    let engine = ExtractionEngine::new(options, Handle::current());

    let decode = tokio::task::spawn_blocking(move || engine.run(reader, &mut progress));
    let ((), decoded) = tokio::join!(stream::pump(stream, tx), decode);

    finish(decoded, start).await
}

/// Extracts from a blocking reader, such as a local archive file.
///
/// # Errors
///
/// See [`extract`].
pub async fn extract_from_reader<R, P>(
    reader: R,
    options: &ExtractOptions,
    mut progress: P,
) -> Result<ExtractionReport>
where
    R: Read + Send + 'static,
    P: ProgressCallback + 'static,
{
    let start = Instant::now();
    let engine = ExtractionEngine::new(options, Handle::current());

    let decoded = tokio::task::spawn_blocking(move || engine.run(reader, &mut progress)).await;

    finish(decoded, start).await
}

async fn finish(
    decoded: std::result::Result<Result<EngineOutcome>, JoinError>,
    start: Instant,
) -> Result<ExtractionReport> {
    let outcome = decoded.map_err(|e| ExtractionError::Task(e.to_string()))??;
    let mut report = outcome.complete().await?;
    report.duration = start.elapsed();
    Ok(report)
}
