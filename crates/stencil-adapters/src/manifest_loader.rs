//! TOML template manifest loader.
//!
//! Parses manifest documents into domain [`TemplateManifest`] values. The
//! built-in manifest is embedded in the binary; additional manifests can be
//! read from a file.
//!
//! # Manifest format
//!
//! ```toml
//! [template]
//! name       = "core-template"
//! version    = "1.0.0"
//! repository = "https://github.com/masterbfk/coreTemplate.git"
//! advisories = ["Check 'src/{{PROJECT_NAME_CAMEL}}/WebAPI/appsettings.json'."]
//!
//! [branch]                  # optional, defaults to master -> main
//! from = "master"
//! to   = "main"
//!
//! [[rename]]
//! kind    = "replace"       # replace | move
//! path    = "coreTemplate.sln"
//! search  = "coreTemplate"
//! replace = "{{PROJECT_NAME_PASCAL}}"
//!
//! [[rename]]
//! kind = "move"
//! from = "src/starterProject"
//! to   = "src/{{PROJECT_NAME_CAMEL}}"
//!
//! [security]                # optional
//! directories = ["src/starterProject/Application/Features/Auth"]
//! files       = ["src/starterProject/WebAPI/Controllers/AuthController.cs"]
//!
//! [[security.line_filters]]
//! path    = "src/starterProject/Persistence/Contexts/BaseDbContext.cs"
//! needles = ["DbSet<User> User"]
//!
//! [[security.block_removals]]
//! path   = "src/starterProject/WebAPI/Program.cs"
//! blocks = ["builder.Services.AddSecurityServices();"]
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use stencil_core::{
    domain::{
        BlockRemovalSpec, DomainError, FeatureRemovalSpec, LineFilterSpec, RenameSpec,
        TemplateId, TemplateManifest,
    },
    error::StencilError,
};

/// Source of the manifest shipped with Stencil.
pub const BUILTIN_CORE_TEMPLATE: &str = include_str!("../templates/core-template.toml");

/// Every built-in manifest document.
pub const BUILTIN_MANIFESTS: &[&str] = &[BUILTIN_CORE_TEMPLATE];

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ManifestLoadError {
    #[error("failed to read manifest '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl From<ManifestLoadError> for StencilError {
    fn from(err: ManifestLoadError) -> Self {
        match err {
            ManifestLoadError::Invalid(domain) => StencilError::Domain(domain),
            other => StencilError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

// ── Document types ───────────────────────────────────────────────────────────

/// Deserialised representation of a manifest document.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct ManifestDocument {
    template: TemplateSection,
    branch: Option<BranchSection>,
    rename: Vec<RenameEntry>,
    #[serde(default)]
    security: SecuritySection,
}

/// `[template]` section: identity, source and advisories.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct TemplateSection {
    name: String,
    version: String,
    repository: String,
    #[serde(default)]
    advisories: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct BranchSection {
    from: String,
    to: String,
}

/// One entry under `[[rename]]`.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RenameEntry {
    Replace {
        path: String,
        search: String,
        replace: String,
    },
    Move {
        from: String,
        to: String,
    },
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
struct SecuritySection {
    #[serde(default)]
    directories: Vec<String>,
    #[serde(default)]
    files: Vec<String>,
    #[serde(default)]
    line_filters: Vec<LineFilterEntry>,
    #[serde(default)]
    block_removals: Vec<BlockRemovalEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct LineFilterEntry {
    path: String,
    needles: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct BlockRemovalEntry {
    path: String,
    blocks: Vec<String>,
}

// ── Loader ───────────────────────────────────────────────────────────────────

/// Parse a manifest document and validate the result.
#[instrument(skip_all)]
pub fn parse_manifest(source: &str) -> Result<TemplateManifest, ManifestLoadError> {
    let doc: ManifestDocument = toml::from_str(source)?;

    let id = TemplateId::parse(&format!("{}@{}", doc.template.name, doc.template.version))?;
    let mut builder = TemplateManifest::builder()
        .id(id)
        .repository_url(doc.template.repository);

    if let Some(branch) = doc.branch {
        builder = builder.branch(branch.from, branch.to);
    }

    for entry in doc.rename {
        builder = builder.rename_step(match entry {
            RenameEntry::Replace {
                path,
                search,
                replace,
            } => RenameSpec::Replace {
                path,
                search,
                replace,
            },
            RenameEntry::Move { from, to } => RenameSpec::Move { from, to },
        });
    }

    for advisory in doc.template.advisories {
        builder = builder.advisory(advisory);
    }

    let security = doc.security;
    let manifest = builder
        .security(FeatureRemovalSpec {
            directories: security.directories,
            files: security.files,
            line_filters: security
                .line_filters
                .into_iter()
                .map(|lf| LineFilterSpec {
                    path: lf.path,
                    needles: lf.needles,
                })
                .collect(),
            block_removals: security
                .block_removals
                .into_iter()
                .map(|br| BlockRemovalSpec {
                    path: br.path,
                    blocks: br.blocks,
                })
                .collect(),
        })
        .build()?;

    debug!(id = %manifest.id, steps = manifest.rename.len(), "Parsed manifest");
    Ok(manifest)
}

/// Read and parse a manifest file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_manifest_file(path: &Path) -> Result<TemplateManifest, ManifestLoadError> {
    let source = fs::read_to_string(path).map_err(|source| ManifestLoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_manifest(&source)
}

/// Parse every built-in manifest.
pub fn builtin_manifests() -> Result<Vec<TemplateManifest>, ManifestLoadError> {
    BUILTIN_MANIFESTS.iter().map(|src| parse_manifest(src)).collect()
}
