//! Extraction reporting.

use std::path::Path;
use std::time::Duration;

use crate::formats::CompressionCodec;

/// Report of a completed extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Number of archive entries that were not selected, or were selected
    /// but have a kind that is never materialized (links, devices).
    pub entries_skipped: usize,

    /// Root directory prefix discovered in the archive.
    pub archive_prefix: Option<String>,

    /// Compression detected on the input stream, if any.
    pub compression: Option<CompressionCodec>,

    /// Duration of the extraction run.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of materialized entries.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}

/// Callback trait for progress reporting during extraction.
///
/// The archive is decoded in a single pass, so the total number of entries
/// is never known up front. `current` counts materialized entries so far.
///
/// # Examples
///
/// ```
/// use gitslice_core::ProgressCallback;
/// use std::path::Path;
///
/// struct SimpleProgress;
///
/// impl ProgressCallback for SimpleProgress {
///     fn on_entry_start(&mut self, path: &Path, current: usize) {
///         println!("#{current}: {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before a selected entry is materialized.
    ///
    /// # Arguments
    ///
    /// * `path` - Destination-relative path of the entry
    /// * `current` - Materialized entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, current: usize);

    /// Called with the size of each file handed to the writer.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called once the entry has been dispatched.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once the archive has been fully decoded.
    fn on_complete(&mut self);
}

impl<P: ProgressCallback + ?Sized> ProgressCallback for Box<P> {
    fn on_entry_start(&mut self, path: &Path, current: usize) {
        (**self).on_entry_start(path, current);
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        (**self).on_bytes_written(bytes);
    }

    fn on_entry_complete(&mut self, path: &Path) {
        (**self).on_entry_complete(path);
    }

    fn on_complete(&mut self) {
        (**self).on_complete();
    }
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
