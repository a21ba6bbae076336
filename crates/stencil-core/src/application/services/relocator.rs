//! Text relocation: rename a file when its path carries a token, then rewrite
//! every occurrence of that token in its content.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    error::{StencilError, StencilResult},
};

/// Applies replacement rules to files under a project root.
///
/// Paths given to and returned by the relocator are relative to the root.
pub struct TextRelocator<'a> {
    filesystem: &'a dyn Filesystem,
    root: &'a Path,
}

impl<'a> TextRelocator<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, root: &'a Path) -> Self {
        Self { filesystem, root }
    }

    /// Relocate `path` if it contains `search_token`, then replace every
    /// occurrence of the token in the file's content.
    ///
    /// Returns the path the file now lives at. Callers must use it for any
    /// later rule that targets the same file.
    pub fn relocate_and_replace(
        &self,
        path: &Path,
        search_token: &str,
        replacement_token: &str,
    ) -> StencilResult<PathBuf> {
        if search_token.is_empty() {
            return Err(StencilError::Internal {
                message: format!("empty search token for {}", path.display()),
            });
        }

        let rendered = path.to_string_lossy();
        let new_path = if rendered.contains(search_token) {
            let target = PathBuf::from(rendered.replace(search_token, replacement_token));
            self.relocate(path, &target)?;
            target
        } else {
            path.to_path_buf()
        };

        let absolute = self.root.join(&new_path);
        let content = self.filesystem.read_to_string(&absolute)?;
        let occurrences = content.matches(search_token).count();
        if occurrences > 0 {
            self.filesystem
                .write_file(&absolute, &content.replace(search_token, replacement_token))?;
        }

        debug!(
            path = %new_path.display(),
            token = search_token,
            occurrences,
            "Replaced token"
        );
        Ok(new_path)
    }

    /// Move a file or directory from `from` to `to`.
    ///
    /// The source must exist and the destination must not.
    pub fn relocate(&self, from: &Path, to: &Path) -> StencilResult<()> {
        if from == to {
            return Ok(());
        }

        let source = self.root.join(from);
        let destination = self.root.join(to);

        if !self.filesystem.exists(&source) {
            return Err(ApplicationError::io(source, "source does not exist").into());
        }
        if self.filesystem.exists(&destination) {
            return Err(ApplicationError::io(destination, "destination already exists").into());
        }

        self.filesystem.rename(&source, &destination)?;
        debug!(from = %from.display(), to = %to.display(), "Relocated");
        Ok(())
    }
}
