//! Core extraction engine.
//!
//! One engine value holds everything scoped to a single run: the selection,
//! the discovered prefix and the set of pending writes. Entries are handled
//! strictly in decoder order.

use std::fs;
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::path::PathBuf;

use log::debug;
use log::trace;
use log::warn;
use tokio::runtime::Handle;

use crate::ExtractOptions;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::extraction::writer::PendingWrites;
use crate::formats::decompress;
use crate::resolver::ArchivePrefix;
use crate::resolver::EntryAction;
use crate::resolver::Selection;
use crate::types::DestDir;
use crate::types::EntryKind;
use crate::types::entry_kind::is_metadata_record;

/// Files up to this size are buffered and written by a background task.
/// Larger ones are copied to disk on the decoding thread.
const BUFFERED_FILE_LIMIT: u64 = 1024 * 1024;

/// Copy buffer for files written on the decoding thread.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Prefix discovery state of a run.
#[derive(Debug)]
enum RunState {
    /// No entry seen yet.
    AwaitingPrefix,
    /// First entry seen; the prefix is fixed for the rest of the run.
    Streaming(Option<ArchivePrefix>),
}

impl RunState {
    /// Records `path` as the first entry if none has been seen, then
    /// returns the prefix in effect.
    fn observe(&mut self, path: &str) -> Option<&ArchivePrefix> {
        if matches!(self, Self::AwaitingPrefix) {
            let prefix = ArchivePrefix::discover(path);
            match &prefix {
                Some(prefix) => debug!("archive root prefix is `{prefix}`"),
                None => warn!("first archive entry `{path}` has no root directory, nothing can match"),
            }
            *self = Self::Streaming(prefix);
        }

        match self {
            Self::Streaming(prefix) => prefix.as_ref(),
            Self::AwaitingPrefix => None,
        }
    }

    fn into_prefix(self) -> Option<ArchivePrefix> {
        match self {
            Self::Streaming(prefix) => prefix,
            Self::AwaitingPrefix => None,
        }
    }
}

/// Streaming extraction engine for one run.
#[derive(Debug)]
pub struct ExtractionEngine {
    destination: PathBuf,
    selection: Selection,
    max_pending_writes: usize,
    max_pending_bytes: u64,
    handle: Handle,
}

impl ExtractionEngine {
    /// Creates an engine for `options`; file writes are spawned on `handle`.
    #[must_use]
    pub fn new(options: &ExtractOptions, handle: Handle) -> Self {
        Self {
            destination: options.destination.clone(),
            selection: Selection::new(options.subpath.clone(), options.keep_folder_name),
            max_pending_writes: options.max_pending_writes,
            max_pending_bytes: options.max_pending_bytes,
            handle,
        }
    }

    /// Decodes `reader` to the end, creating directories and spawning file
    /// writes for every selected entry.
    ///
    /// Must run on a blocking thread. The returned [`EngineOutcome`] still
    /// owns the writes in flight; await [`EngineOutcome::complete`] to
    /// finish the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created, the stream
    /// cannot be decoded, a directory cannot be created, a rewritten path
    /// escapes the destination, or a write already failed.
    pub fn run<R: Read + Send>(
        self,
        reader: R,
        progress: &mut dyn ProgressCallback,
    ) -> Result<EngineOutcome> {
        let dest = DestDir::create(&self.destination)?;
        let (compression, decoded) = decompress(reader).map_err(ExtractionError::Stream)?;
        match compression {
            Some(codec) => debug!("decoding {} compressed archive", codec.name()),
            None => debug!("decoding uncompressed archive"),
        }

        let mut archive = tar::Archive::new(decoded);
        let mut state = RunState::AwaitingPrefix;
        let mut pending = PendingWrites::new(
            self.handle.clone(),
            self.max_pending_writes,
            self.max_pending_bytes,
        );
        let mut report = ExtractionReport {
            compression,
            ..ExtractionReport::default()
        };
        let mut materialized = 0usize;
        let mut matched = false;

        for entry in archive.entries().map_err(ExtractionError::Stream)? {
            let mut entry = entry.map_err(ExtractionError::Stream)?;
            let entry_type = entry.header().entry_type();
            if is_metadata_record(entry_type) {
                trace!("skipping metadata record {entry_type:?}");
                continue;
            }

            let path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let prefix = state.observe(&path);

            let action = self
                .selection
                .resolve(&path, EntryKind::from(entry_type), prefix)?;
            matched |= action.is_match();

            match action {
                EntryAction::Skip => {
                    trace!("skipping `{path}`");
                    report.entries_skipped += 1;
                }
                EntryAction::Discard => {
                    debug!("discarding {entry_type:?} entry `{path}`");
                    report.entries_skipped += 1;
                }
                EntryAction::CreateDir(relative) => {
                    materialized += 1;
                    let rel_path = Path::new(&relative);
                    progress.on_entry_start(rel_path, materialized);

                    let target = dest.join(&relative);
                    create_dir_all(&target)?;
                    report.directories_created += 1;
                    trace!("created directory {}", target.display());

                    progress.on_entry_complete(rel_path);
                }
                EntryAction::WriteFile(relative) => {
                    materialized += 1;
                    let rel_path = Path::new(&relative);
                    progress.on_entry_start(rel_path, materialized);

                    let target = dest.join(&relative);
                    if let Some(parent) = target.parent() {
                        create_dir_all(parent)?;
                    }

                    if entry.size() > BUFFERED_FILE_LIMIT {
                        let written = copy_to_file(&mut entry, &target, &path)?;
                        report.files_extracted += 1;
                        report.bytes_written += written;
                        progress.on_bytes_written(written);
                    } else {
                        let contents = read_contents(&mut entry, &path)?;
                        progress.on_bytes_written(contents.len() as u64);
                        pending.spawn(target, contents)?;
                    }

                    progress.on_entry_complete(rel_path);
                }
            }

            pending.reap()?;
        }

        progress.on_complete();

        let prefix = state.into_prefix();
        debug!(
            "archive decoded: {materialized} entries materialized, {} skipped, {} writes pending",
            report.entries_skipped,
            pending.len()
        );
        report.archive_prefix = prefix.map(|prefix| prefix.as_str().to_string());

        Ok(EngineOutcome {
            report,
            pending,
            matched,
            subpath: self.selection.subpath().to_string(),
        })
    }
}

/// A fully decoded archive whose file writes may still be running.
#[derive(Debug)]
#[must_use = "pending writes are aborted unless the outcome is completed"]
pub struct EngineOutcome {
    report: ExtractionReport,
    pending: PendingWrites,
    matched: bool,
    subpath: String,
}

impl EngineOutcome {
    /// Waits for every pending write and produces the final report.
    ///
    /// # Errors
    ///
    /// Returns the first failed write, or [`ExtractionError::NoFilesFound`]
    /// if no entry lay below the requested subpath.
    pub async fn complete(self) -> Result<ExtractionReport> {
        let Self {
            mut report,
            pending,
            matched,
            subpath,
        } = self;

        let totals = pending.drain().await?;
        report.files_extracted += totals.files;
        report.bytes_written += totals.bytes;

        if !matched {
            return Err(ExtractionError::NoFilesFound { subpath });
        }

        debug!(
            "extracted {} files and {} directories ({} bytes)",
            report.files_extracted, report.directories_created, report.bytes_written
        );
        Ok(report)
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| ExtractionError::filesystem(path, e))
}

/// Reads the whole content of one small entry, checking it against the
/// size declared in its header.
fn read_contents<R: Read>(entry: &mut tar::Entry<'_, R>, path: &str) -> Result<Vec<u8>> {
    let declared = entry.size();
    let mut contents = Vec::with_capacity(declared.min(BUFFERED_FILE_LIMIT) as usize);
    entry
        .read_to_end(&mut contents)
        .map_err(ExtractionError::Stream)?;

    check_complete(path, declared, contents.len() as u64)?;
    Ok(contents)
}

/// Copies one large entry to `target` through a fixed-size buffer.
fn copy_to_file<R: Read>(
    entry: &mut tar::Entry<'_, R>,
    target: &Path,
    path: &str,
) -> Result<u64> {
    let declared = entry.size();
    let mut file =
        fs::File::create(target).map_err(|e| ExtractionError::filesystem(target, e))?;
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let n = match entry.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ExtractionError::Stream(e)),
        };
        file.write_all(&buffer[..n])
            .map_err(|e| ExtractionError::filesystem(target, e))?;
        written += n as u64;
    }

    check_complete(path, declared, written)?;
    trace!("wrote {} ({written} bytes) directly", target.display());
    Ok(written)
}

fn check_complete(path: &str, declared: u64, read: u64) -> Result<()> {
    if read < declared {
        return Err(ExtractionError::Stream(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("entry `{path}` truncated: expected {declared} bytes, got {read}"),
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::report::NoopProgress;
    use crate::test_utils::TarTestBuilder;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_run_state_fixes_first_prefix() {
        let mut state = RunState::AwaitingPrefix;
        assert_eq!(
            state.observe("owner-repo-abc/").map(ArchivePrefix::as_str),
            Some("owner-repo-abc/")
        );
        assert_eq!(
            state.observe("other-root/file.ts").map(ArchivePrefix::as_str),
            Some("owner-repo-abc/")
        );
        assert_eq!(
            state.into_prefix().unwrap().as_str(),
            "owner-repo-abc/"
        );
    }

    #[test]
    fn test_run_state_without_prefix_stays_unknown() {
        let mut state = RunState::AwaitingPrefix;
        assert!(state.observe("README.md").is_none());
        assert!(state.observe("owner-repo-abc/file.ts").is_none());
        assert!(state.into_prefix().is_none());
    }

    async fn run_engine(archive: Vec<u8>, options: ExtractOptions) -> Result<ExtractionReport> {
        let engine = ExtractionEngine::new(&options, Handle::current());
        let outcome = tokio::task::spawn_blocking(move || {
            engine.run(Cursor::new(archive), &mut NoopProgress)
        })
        .await
        .unwrap()?;
        outcome.complete().await
    }

    #[tokio::test]
    async fn test_engine_reports_prefix_and_counts() {
        let temp = TempDir::new().unwrap();
        let archive = TarTestBuilder::new()
            .add_directory("owner-repo-abc/")
            .add_file("owner-repo-abc/README.md", b"root")
            .add_directory("owner-repo-abc/examples/")
            .add_file("owner-repo-abc/examples/demo.ts", b"demo")
            .build_gz();

        let options = ExtractOptions::new(temp.path(), "examples");
        let report = run_engine(archive, options).await.unwrap();

        assert_eq!(report.archive_prefix.as_deref(), Some("owner-repo-abc/"));
        assert_eq!(report.files_extracted, 1);
        assert_eq!(report.bytes_written, 4);
        assert_eq!(report.entries_skipped, 3);
        assert_eq!(
            report.compression,
            Some(crate::formats::CompressionCodec::Gzip)
        );
    }

    #[tokio::test]
    async fn test_engine_writes_large_file_directly() {
        let temp = TempDir::new().unwrap();
        let content: Vec<u8> = (0..3 * BUFFERED_FILE_LIMIT)
            .map(|i| (i % 251) as u8)
            .collect();
        let archive = TarTestBuilder::new()
            .add_directory("owner-repo-abc/")
            .add_file("owner-repo-abc/examples/big.bin", &content)
            .add_file("owner-repo-abc/examples/small.txt", b"small")
            .build_gz();

        let options = ExtractOptions::new(temp.path(), "examples");
        let report = run_engine(archive, options).await.unwrap();

        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.bytes_written, content.len() as u64 + 5);
        assert_eq!(fs::read(temp.path().join("big.bin")).unwrap(), content);
        assert_eq!(fs::read(temp.path().join("small.txt")).unwrap(), b"small");
    }

    #[tokio::test]
    async fn test_engine_detects_truncated_large_entry() {
        let temp = TempDir::new().unwrap();
        let mut archive = TarTestBuilder::new()
            .add_directory("owner-repo-abc/")
            .add_file(
                "owner-repo-abc/examples/big.bin",
                &vec![7u8; 2 * BUFFERED_FILE_LIMIT as usize],
            )
            .build();
        archive.truncate(512 * 2 + BUFFERED_FILE_LIMIT as usize);

        let options = ExtractOptions::new(temp.path(), "examples");
        let err = run_engine(archive, options).await.unwrap_err();
        assert!(err.is_stream_error(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_engine_only_links_match() {
        let temp = TempDir::new().unwrap();
        let archive = TarTestBuilder::new()
            .add_directory("owner-repo-abc/")
            .add_symlink("owner-repo-abc/examples/link.ts", "../README.md")
            .build_gz();

        let options = ExtractOptions::new(temp.path(), "examples");
        let report = run_engine(archive, options).await.unwrap();

        assert_eq!(report.total_items(), 0);
        assert_eq!(report.entries_skipped, 2);
    }

    #[tokio::test]
    async fn test_engine_detects_truncated_entry() {
        let temp = TempDir::new().unwrap();
        let mut archive = TarTestBuilder::new()
            .add_directory("owner-repo-abc/")
            .add_file("owner-repo-abc/examples/big.bin", &[7u8; 4096])
            .build();
        archive.truncate(512 * 2 + 1000);

        let options = ExtractOptions::new(temp.path(), "examples");
        let err = run_engine(archive, options).await.unwrap_err();
        assert!(err.is_stream_error(), "unexpected error: {err}");
    }
}
