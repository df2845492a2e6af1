//! Repository implementations module.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `file`: JSON metadata files on disk, one per document
pub mod local;
#[cfg(feature = "file-repo")]
pub mod file;

pub use local::LocalRepository;
#[cfg(feature = "file-repo")]
pub use file::FileRepository;
