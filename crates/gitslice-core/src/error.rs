//! Error types for subdirectory extraction and source resolution.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while extracting a subdirectory from an archive.
///
/// Every variant is terminal for the run. Files written before the failure
/// are left in place.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The archive contained no entry under the requested subpath.
    #[error("no files found at path `{subpath}`")]
    NoFilesFound {
        /// The requested subpath, as given by the caller.
        subpath: String,
    },

    /// The archive stream ended early, was not valid archive data, or the
    /// transport failed mid-read.
    #[error("failed to read archive stream: {0}")]
    Stream(#[source] std::io::Error),

    /// Creating a directory or writing a file failed.
    #[error("failed to write {}: {source}", path.display())]
    Filesystem {
        /// The destination path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rewritten entry path would leave the destination directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending archive entry path.
        path: String,
    },

    /// A background write task panicked or was cancelled.
    #[error("write task failed: {0}")]
    Task(String),
}

impl ExtractionError {
    /// Creates a filesystem error for the given destination path.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the archive had nothing under the requested subpath.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitslice_core::ExtractionError;
    ///
    /// let err = ExtractionError::NoFilesFound {
    ///     subpath: "examples".into(),
    /// };
    /// assert!(err.is_no_match());
    /// ```
    #[must_use]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NoFilesFound { .. })
    }

    /// Returns `true` if the failure came from reading or decoding the
    /// archive stream rather than from the local filesystem.
    #[must_use]
    pub const fn is_stream_error(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Returns the destination path involved in a filesystem error.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Filesystem { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Errors raised while resolving a repository source or downloading its
/// archive.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source string could not be parsed.
    #[error("invalid source `{input}`: {reason}")]
    InvalidSource {
        /// The source string as given.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The URL points at a host that is not a supported provider.
    #[error("unsupported host `{host}`")]
    UnsupportedHost {
        /// The host name from the URL.
        host: String,
    },

    /// The provider answered with a non-success status.
    #[error("request for {url} failed with HTTP status {status}")]
    Http {
        /// The archive URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The HTTP request could not be performed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl SourceError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code for provider errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
