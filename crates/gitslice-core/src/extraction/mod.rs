//! Streaming extraction pipeline.
//!
//! - [`stream`]: async byte stream to blocking reader bridge
//! - [`engine`]: per-run decoding, selection and materialization
//! - [`writer`]: bounded set of in-flight file writes

pub mod engine;
pub mod stream;
pub mod writer;

pub use engine::EngineOutcome;
pub use engine::ExtractionEngine;
