//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stencil-adapters` crate provides implementations.

use crate::application::CancellationToken;
use crate::domain::{TemplateId, TemplateManifest};
use crate::error::StencilResult;
use std::path::{Path, PathBuf};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Contract
///
/// - Failures are reported as `ApplicationError::Io`, except undecodable
///   content which is `ApplicationError::Encoding`
/// - `rename`, `remove_dir_all` and `remove_file` fail when the source is
///   missing; `rename` also fails when the destination exists
/// - `write_file` creates missing parent directories
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> StencilResult<String>;

    /// Write content to a file, replacing what was there.
    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()>;

    /// Move a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> StencilResult<()>;

    /// Every file under `root`, recursively, sorted.
    fn list_files(&self, root: &Path) -> StencilResult<Vec<PathBuf>>;
}

/// Port for running version control commands.
///
/// Implemented by:
/// - `stencil_adapters::git::GitCli` (spawns `git`)
///
/// The working directory is always explicit; implementations never change
/// the process-wide current directory.
pub trait VersionControl: Send + Sync {
    /// Run one command to completion.
    ///
    /// Returns `ApplicationError::Subprocess` on a non-zero exit and
    /// `ApplicationError::Cancelled` when `cancel` fires while waiting.
    fn run(
        &self,
        args: &[&str],
        working_dir: &Path,
        cancel: &CancellationToken,
    ) -> StencilResult<()>;
}

/// Port for template manifest storage and retrieval.
///
/// Implemented by:
/// - `stencil_adapters::manifest_store::InMemoryManifestStore` (built-in manifests)
pub trait ManifestStore: Send + Sync {
    /// Get a manifest by id, or `ApplicationError::TemplateNotFound`.
    fn get(&self, id: &TemplateId) -> StencilResult<TemplateManifest>;

    /// List all manifests, ordered by id.
    fn list(&self) -> StencilResult<Vec<TemplateManifest>>;

    /// Insert or replace a manifest. Invalid manifests are rejected.
    fn insert(&self, manifest: TemplateManifest) -> StencilResult<()>;
}
