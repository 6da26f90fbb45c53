//! Streaming subdirectory extraction from Git hosting provider archives.
//!
//! `gitslice-core` pulls one directory out of a repository tarball (as served
//! by GitHub, GitLab or Bitbucket) without cloning the repository and without
//! buffering the archive in memory. The archive is decoded in a single
//! forward pass: the provider-generated root directory is discovered from the
//! first entry, entries outside the requested subpath are skipped, and the
//! remaining entries are written under the destination with their leading
//! path segments stripped.
//!
//! # Examples
//!
//! ```no_run
//! use gitslice_core::ExtractOptions;
//! use gitslice_core::FetchOptions;
//! use gitslice_core::RepoSource;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = RepoSource::parse("rust-lang/rust-by-example/src")?;
//! let stream = gitslice_core::fetch_archive(&source, &FetchOptions::default()).await?;
//!
//! let options = ExtractOptions::new("./rbe-src", source.subpath.clone());
//! let report = gitslice_core::extract(stream, &options).await?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod formats;
pub mod report;
pub mod resolver;
pub mod source;
#[doc(hidden)]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::extract;
pub use api::extract_from_reader;
pub use api::extract_with_progress;
pub use config::ExtractOptions;
pub use error::ExtractionError;
pub use error::Result;
pub use error::SourceError;
pub use fetch::FetchOptions;
pub use fetch::fetch_archive;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use source::Provider;
pub use source::RepoSource;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryKind;
pub use types::Subpath;
