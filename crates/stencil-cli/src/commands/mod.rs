//! Command handlers. Each one translates parsed arguments into core calls
//! and renders the result through the `OutputManager`.

pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod template;

use std::path::Path;

use tracing::debug;

use stencil_adapters::{InMemoryManifestStore, load_manifest_file};
use stencil_core::{
    application::{ManifestStore, TemplateService},
    domain::{TemplateId, TemplateManifest},
    error::StencilError,
};

use crate::error::CliResult;

/// Template service over the built-in manifests, or over `extra` alone.
pub(crate) fn template_service(extra: Option<&Path>) -> CliResult<TemplateService> {
    let store = match extra {
        Some(path) => {
            let store = InMemoryManifestStore::new();
            store.insert(load_manifest_file(path).map_err(StencilError::from)?)?;
            store
        }
        None => InMemoryManifestStore::with_builtin()?,
    };
    debug!(manifests = store.len(), "Manifest store ready");
    Ok(TemplateService::new(Box::new(store)))
}

/// The manifest a `new` run uses: a file, a built-in id, or the default.
pub(crate) fn resolve_manifest(
    template: Option<&str>,
    manifest: Option<&Path>,
) -> CliResult<TemplateManifest> {
    let service = template_service(manifest)?;
    let resolved = match template {
        Some(id) => service.get(&TemplateId::parse(id).map_err(StencilError::from)?)?,
        None => service.list()?.into_iter().next().ok_or_else(|| {
            StencilError::Configuration {
                message: "no template manifests are available".into(),
            }
        })?,
    };
    Ok(resolved)
}
