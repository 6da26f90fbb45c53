//! Typed wrappers used by the extraction pipeline.
//!
//! - [`Subpath`]: the requested directory, normalized into segments
//! - [`EntryKind`]: the three entry kinds the engine distinguishes
//! - [`DestDir`]: an existing, canonical destination directory

pub mod dest_dir;
pub mod entry_kind;
pub mod subpath;

pub use dest_dir::DestDir;
pub use entry_kind::EntryKind;
pub use subpath::Subpath;
