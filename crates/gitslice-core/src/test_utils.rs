//! Test utilities for building provider-style archives in memory.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Write;
use std::io::{self};

use bytes::Bytes;
use futures_util::Stream;

/// Longest name that fits the classic tar header name field.
const HEADER_NAME_LEN: usize = 100;

/// Builder for creating test TAR archives with a fluent API.
///
/// Names up to 100 bytes are written into the header verbatim, so trailing
/// slashes and `..` components survive exactly as given. Longer names go
/// through GNU long-name records.
///
/// # Examples
///
/// ```
/// use gitslice_core::test_utils::TarTestBuilder;
///
/// let tar_gz = TarTestBuilder::new()
///     .add_pax_global_header("3f2a9c1")
///     .add_directory("owner-repo-3f2a9c1/")
///     .add_file("owner-repo-3f2a9c1/examples/demo.ts", b"export {}")
///     .add_symlink("owner-repo-3f2a9c1/examples/link", "demo.ts")
///     .build_gz();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a pax global header carrying the commit id, as GitHub does at
    /// the start of every tarball.
    #[must_use]
    pub fn add_pax_global_header(mut self, commit: &str) -> Self {
        let record = pax_record("comment", commit);
        let mut header = tar::Header::new_ustar();
        header.set_entry_type(tar::EntryType::XGlobalHeader);
        header.set_size(record.len() as u64);
        header.set_mode(0o666);
        self.append(header, "pax_global_header", record.as_bytes());
        self
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        self.append(header, path, data);
        self
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        self.append(header, path, &[]);
        self
    }

    /// Adds a symlink to the archive.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_link_name(target).unwrap();
        self.append(header, path, &[]);
        self
    }

    /// Adds a hardlink to the archive.
    #[must_use]
    pub fn add_hardlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Link);
        header.set_link_name(target).unwrap();
        self.append(header, path, &[]);
        self
    }

    fn append(&mut self, mut header: tar::Header, path: &str, data: &[u8]) {
        if path.len() <= HEADER_NAME_LEN {
            header.as_old_mut().name[..path.len()].copy_from_slice(path.as_bytes());
            header.set_cksum();
            self.builder.append(&header, data).unwrap();
        } else {
            self.builder.append_data(&mut header, path, data).unwrap();
        }
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    /// Builds the archive and gzip-compresses it, like a provider tarball.
    #[must_use]
    pub fn build_gz(self) -> Vec<u8> {
        let tar = self.build();
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&tar).unwrap();
        encoder.finish().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn pax_record(key: &str, value: &str) -> String {
    let body = format!(" {key}={value}\n");
    // The length prefix counts its own digits.
    let mut len = body.len();
    loop {
        let total = body.len() + len.to_string().len();
        if total == len {
            break;
        }
        len = total;
    }
    format!("{len}{body}")
}

/// Splits `data` into a byte stream of `chunk_size` chunks.
pub fn chunked_stream(
    data: Vec<u8>,
    chunk_size: usize,
) -> impl Stream<Item = io::Result<Bytes>> + Send + Unpin + 'static {
    let chunks: Vec<io::Result<Bytes>> = data
        .chunks(chunk_size.max(1))
        .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
        .collect();
    futures_util::stream::iter(chunks)
}

/// Like [`chunked_stream`], but the transport fails after `fail_after`
/// chunks.
pub fn failing_stream(
    data: Vec<u8>,
    chunk_size: usize,
    fail_after: usize,
) -> impl Stream<Item = io::Result<Bytes>> + Send + Unpin + 'static {
    let mut chunks: Vec<io::Result<Bytes>> = data
        .chunks(chunk_size.max(1))
        .take(fail_after)
        .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
        .collect();
    chunks.push(Err(io::Error::new(
        io::ErrorKind::ConnectionReset,
        "connection reset by peer",
    )));
    futures_util::stream::iter(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_pax_record_length() {
        let record = pax_record("comment", "abc");
        assert_eq!(record, "15 comment=abc\n");
        assert_eq!(record.len(), 15);

        let record = pax_record("k", "v");
        assert_eq!(record, "6 k=v\n");
    }

    #[test]
    fn test_builder_keeps_names_verbatim() {
        let tar = TarTestBuilder::new()
            .add_pax_global_header("abc")
            .add_directory("root/")
            .add_file("root/a/../b.txt", b"x")
            .build();

        let mut archive = tar::Archive::new(tar.as_slice());
        let entries: Vec<(tar::EntryType, String)> = archive
            .entries()
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                (
                    entry.header().entry_type(),
                    String::from_utf8_lossy(&entry.path_bytes()).into_owned(),
                )
            })
            .collect();

        assert_eq!(
            entries,
            [
                (tar::EntryType::XGlobalHeader, "pax_global_header".into()),
                (tar::EntryType::Directory, "root/".into()),
                (tar::EntryType::Regular, "root/a/../b.txt".into()),
            ]
        );
    }

    #[test]
    fn test_build_gz_decodes() {
        let gz = TarTestBuilder::new().add_file("root/a.txt", b"a").build_gz();
        let mut decoder = flate2::read::GzDecoder::new(gz.as_slice());
        let mut tar = Vec::new();
        decoder.read_to_end(&mut tar).unwrap();
        assert_eq!(tar.len() % 512, 0);
    }
}
