//! Compression codec detection for archive streams.
//!
//! Providers serve gzip-compressed tarballs, but nothing in the pipeline
//! depends on that: the codec is sniffed from the first bytes of the stream
//! and the matching decoder is stacked on top of it. Streams without a known
//! magic number are treated as plain tar.
//!
//! # Supported Codecs
//!
//! - **Gzip** (.tar.gz, .tgz)
//! - **Bzip2** (.tar.bz2, .tbz2)
//! - **Xz** (.tar.xz, .txz)
//! - **Zstd** (.tar.zst, .tzst)

use std::io::Cursor;
use std::io::Read;
use std::io::{self};

const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xFD, b'7', b'z', b'X', b'Z', 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];

/// Longest magic number we look for.
const MAGIC_LEN: usize = 6;

/// Compression codec wrapping a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,

    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,

    /// Xz compression (LZMA2 algorithm).
    Xz,

    /// Zstd compression (Zstandard algorithm).
    Zstd,
}

impl CompressionCodec {
    /// Identifies a codec from the leading bytes of a stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitslice_core::formats::compression::CompressionCodec;
    ///
    /// assert_eq!(
    ///     CompressionCodec::detect(&[0x1F, 0x8B, 0x08]),
    ///     Some(CompressionCodec::Gzip)
    /// );
    /// assert_eq!(CompressionCodec::detect(b"owner-repo"), None);
    /// ```
    #[must_use]
    pub fn detect(header: &[u8]) -> Option<Self> {
        [
            (GZIP_MAGIC, Self::Gzip),
            (BZIP2_MAGIC, Self::Bzip2),
            (XZ_MAGIC, Self::Xz),
            (ZSTD_MAGIC, Self::Zstd),
        ]
        .into_iter()
        .find(|(magic, _)| header.starts_with(magic))
        .map(|(_, codec)| codec)
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Wraps `reader` in the streaming decoder for this codec.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder cannot be initialized.
    pub fn decoder<'a, R: Read + Send + 'a>(self, reader: R) -> io::Result<Box<dyn Read + Send + 'a>> {
        Ok(match self {
            Self::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

/// Sniffs the codec of `reader` and returns a reader over the decompressed
/// tar data.
///
/// The sniffed bytes are replayed in front of the remaining stream, so no
/// data is lost. Only the magic bytes are buffered.
///
/// # Errors
///
/// Returns an error if reading the leading bytes fails or the decoder cannot
/// be initialized.
pub fn decompress<'a, R: Read + Send + 'a>(
    mut reader: R,
) -> io::Result<(Option<CompressionCodec>, Box<dyn Read + Send + 'a>)> {
    let mut magic = [0u8; MAGIC_LEN];
    let mut filled = 0;
    while filled < MAGIC_LEN {
        match reader.read(&mut magic[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    let header = &magic[..filled];
    let codec = CompressionCodec::detect(header);
    let replayed = Cursor::new(header.to_vec()).chain(reader);

    let decoded = match codec {
        Some(codec) => codec.decoder(replayed)?,
        None => Box::new(replayed),
    };

    Ok((codec, decoded))
}
