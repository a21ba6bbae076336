//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod git;
pub mod manifest_loader;
pub mod manifest_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use git::GitCli;
pub use manifest_loader::{ManifestLoadError, load_manifest_file, parse_manifest};
pub use manifest_store::InMemoryManifestStore;
