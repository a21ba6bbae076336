//! In-memory manifest store with the built-in manifests.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use tracing::debug;

use stencil_core::{
    application::{ApplicationError, ports::ManifestStore},
    domain::{DomainValidator as validator, TemplateId, TemplateManifest},
    error::{StencilError, StencilResult},
};

use crate::manifest_loader;

/// Thread-safe in-memory manifest store.
#[derive(Clone, Default)]
pub struct InMemoryManifestStore {
    inner: Arc<RwLock<BTreeMap<TemplateId, TemplateManifest>>>,
}

impl InMemoryManifestStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with built-in manifests loaded.
    pub fn with_builtin() -> StencilResult<Self> {
        let store = Self::new();
        store.load_builtin()?;
        Ok(store)
    }

    /// Load built-in manifests.
    pub fn load_builtin(&self) -> StencilResult<()> {
        for manifest in manifest_loader::builtin_manifests()? {
            self.insert(manifest)?;
        }
        Ok(())
    }

    /// The manifest used when none is requested: the first built-in one.
    pub fn default_manifest(&self) -> StencilResult<TemplateManifest> {
        self.list()?
            .into_iter()
            .next()
            .ok_or_else(|| StencilError::Configuration {
                message: "no template manifests are available".into(),
            })
    }

    /// Get the number of manifests.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ManifestStore for InMemoryManifestStore {
    fn get(&self, id: &TemplateId) -> StencilResult<TemplateManifest> {
        let inner = self.inner.read().map_err(|_| lock_error())?;

        inner.get(id).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound { id: id.to_string() }.into()
        })
    }

    fn list(&self) -> StencilResult<Vec<TemplateManifest>> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, manifest: TemplateManifest) -> StencilResult<()> {
        // Validate before insertion
        validator::validate_manifest(&manifest)?;

        let mut inner = self.inner.write().map_err(|_| lock_error())?;
        debug!(id = %manifest.id, "Registering manifest");
        inner.insert(manifest.id.clone(), manifest);
        Ok(())
    }
}

fn lock_error() -> StencilError {
    StencilError::Internal {
        message: "manifest store lock poisoned".into(),
    }
}
