//! Archive stream decoding.

pub mod compression;

pub use compression::CompressionCodec;
pub use compression::decompress;
