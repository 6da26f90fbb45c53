//! Extraction options.

use std::path::PathBuf;

use crate::types::Subpath;

/// Default upper bound on file writes in flight at once.
pub const DEFAULT_MAX_PENDING_WRITES: usize = 64;

/// Default upper bound on file content buffered for writes in flight.
pub const DEFAULT_MAX_PENDING_BYTES: u64 = 32 * 1024 * 1024;

/// Options for one extraction run.
///
/// # Examples
///
/// ```
/// use gitslice_core::ExtractOptions;
///
/// let options = ExtractOptions::new("./out", "packages/core").with_keep_folder_name(true);
/// assert_eq!(options.strip_count(), 2);
/// assert!(options.output_root().ends_with("out/core"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory extracted entries are written under. Created if missing.
    pub destination: PathBuf,

    /// Repository subdirectory to extract.
    pub subpath: Subpath,

    /// Keep the last subpath segment as a directory inside `destination`
    /// instead of flattening it away.
    pub keep_folder_name: bool,

    /// Maximum number of file writes in flight before the decoder waits.
    pub max_pending_writes: usize,

    /// Maximum number of content bytes held by writes in flight before the
    /// decoder waits.
    pub max_pending_bytes: u64,
}

impl Default for ExtractOptions {
    /// Extracts the whole repository into the current directory.
    fn default() -> Self {
        Self {
            destination: PathBuf::from("."),
            subpath: Subpath::default(),
            keep_folder_name: false,
            max_pending_writes: DEFAULT_MAX_PENDING_WRITES,
            max_pending_bytes: DEFAULT_MAX_PENDING_BYTES,
        }
    }
}

impl ExtractOptions {
    /// Creates options for extracting `subpath` into `destination`.
    pub fn new(destination: impl Into<PathBuf>, subpath: impl Into<Subpath>) -> Self {
        Self {
            destination: destination.into(),
            subpath: subpath.into(),
            ..Default::default()
        }
    }

    /// Sets whether the last subpath segment is kept as a directory.
    pub fn with_keep_folder_name(mut self, keep: bool) -> Self {
        self.keep_folder_name = keep;
        self
    }

    /// Sets the in-flight write bound. Values below one are raised to one.
    pub fn with_max_pending_writes(mut self, limit: usize) -> Self {
        self.max_pending_writes = limit.max(1);
        self
    }

    /// Sets the in-flight byte bound.
    pub fn with_max_pending_bytes(mut self, limit: u64) -> Self {
        self.max_pending_bytes = limit;
        self
    }

    /// Number of leading path segments removed from every matched entry.
    #[must_use]
    pub fn strip_count(&self) -> usize {
        crate::resolver::strip_count(self.subpath.len(), self.keep_folder_name)
    }

    /// Directory that receives the extracted tree.
    ///
    /// This is `destination` itself, or `destination/<last segment>` when
    /// the folder name is kept.
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        match self.subpath.last() {
            Some(last) if self.keep_folder_name => self.destination.join(last),
            _ => self.destination.clone(),
        }
    }
}
