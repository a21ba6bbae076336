//! Template Service - template manifest queries.
//!
//! Separated from ScaffoldPipeline for single responsibility.

use crate::{
    application::ports::ManifestStore,
    domain::{TemplateId, TemplateManifest},
    error::StencilResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub repository_url: String,
    pub branch: String,
    pub rename_steps: usize,
    pub security_deletions: usize,
    pub security_edits: usize,
    pub advisories: Vec<String>,
}

impl From<&TemplateManifest> for TemplateInfo {
    fn from(manifest: &TemplateManifest) -> Self {
        let security = &manifest.security;
        Self {
            id: manifest.id.to_string(),
            repository_url: manifest.repository_url.clone(),
            branch: format!("{} -> {}", manifest.branch.from, manifest.branch.to),
            rename_steps: manifest.rename.len(),
            security_deletions: security.directories.len() + security.files.len(),
            security_edits: security.line_filters.len() + security.block_removals.len(),
            advisories: manifest.advisories.clone(),
        }
    }
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn ManifestStore>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(store: Box<dyn ManifestStore>) -> Self {
        Self { store }
    }

    /// Get a manifest by ID.
    pub fn get(&self, id: &TemplateId) -> StencilResult<TemplateManifest> {
        self.store.get(id)
    }

    /// List all manifests.
    pub fn list(&self) -> StencilResult<Vec<TemplateManifest>> {
        self.store.list()
    }

    /// Display summaries of every manifest.
    pub fn list_templates(&self) -> StencilResult<Vec<TemplateInfo>> {
        Ok(self.store.list()?.iter().map(TemplateInfo::from).collect())
    }
}
