//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use stencil_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{StencilError, StencilResult},
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle while the pipeline owns
/// another. Follows the same failure rules as `LocalFilesystem`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_parents(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current.filter(|d| !d.as_os_str().is_empty()) {
            self.directories.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filesystem holding the given files.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let fs = Self::new();
        fs.seed(files);
        fs
    }

    /// Add files, creating their parent directories (testing helper).
    pub fn seed<P, C>(&self, files: impl IntoIterator<Item = (P, C)>)
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        if let Ok(mut inner) = self.inner.write() {
            for (path, content) in files {
                let path = path.into();
                inner.add_parents(&path);
                inner.files.insert(path, content.into());
            }
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// All files, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> StencilResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| lock_error())
    }

    fn write(&self) -> StencilResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| lock_error())
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.is_dir(path))
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> StencilResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::io(path, "file does not exist").into())
    }

    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
        let mut inner = self.write()?;
        if inner.is_dir(path) {
            return Err(ApplicationError::io(path, "is a directory").into());
        }
        inner.add_parents(path);
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(to) || inner.is_dir(to) {
            return Err(ApplicationError::io(to, "destination already exists").into());
        }

        if let Some(content) = inner.files.remove(from) {
            inner.add_parents(to);
            inner.files.insert(to.to_path_buf(), content);
            return Ok(());
        }
        if !inner.is_dir(from) {
            return Err(ApplicationError::io(from, "source does not exist").into());
        }

        let rebase = |p: &Path| -> PathBuf {
            match p.strip_prefix(from) {
                Ok(rest) if rest.as_os_str().is_empty() => to.to_path_buf(),
                Ok(rest) => to.join(rest),
                Err(_) => p.to_path_buf(),
            }
        };

        let moved_files: Vec<_> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in moved_files {
            if let Some(content) = inner.files.remove(&old) {
                inner.files.insert(rebase(&old), content);
            }
        }

        let moved_dirs: Vec<_> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in moved_dirs {
            inner.directories.remove(&old);
            inner.directories.insert(rebase(&old));
        }
        inner.add_parents(to);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.write()?;
        if !inner.is_dir(path) {
            return Err(ApplicationError::io(path, "directory does not exist").into());
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> StencilResult<()> {
        self.write()?
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| ApplicationError::io(path, "file does not exist").into())
    }

    fn list_files(&self, root: &Path) -> StencilResult<Vec<PathBuf>> {
        Ok(self
            .read()?
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }
}

fn lock_error() -> StencilError {
    StencilError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}
