//! Template manifests: the declarative description of one template snapshot.
//!
//! A manifest names the repository to clone, the rename steps that turn the
//! template into a project, the security feature removal table, and the
//! advisories shown when scaffolding completes. Paths are written relative to
//! the project root as they appear in the template snapshot; strings may use
//! the `{{PROJECT_NAME*}}` placeholders of [`RenderContext`].

use std::collections::HashSet;
use std::path::Path;

use super::common::RelativePath;
use super::rules::{
    BlockRemoval, LineFilter, RelocationLedger, RemovalSet, RenameStep, ReplacementRule,
};
use crate::domain::{error::DomainError, naming::RenderContext, value_objects::TemplateId};

/// Default branch rename applied after `git init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRename {
    pub from: String,
    pub to: String,
}

/// Unrendered rename step as declared in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameSpec {
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFilterSpec {
    pub path: String,
    pub needles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRemovalSpec {
    pub path: String,
    pub blocks: Vec<String>,
}

/// Unrendered removal table for an optional feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRemovalSpec {
    pub directories: Vec<String>,
    pub files: Vec<String>,
    pub line_filters: Vec<LineFilterSpec>,
    pub block_removals: Vec<BlockRemovalSpec>,
}

/// A validated template manifest.
///
/// Construct through [`TemplateManifest::builder`]; `build()` validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateManifest {
    pub id: TemplateId,
    pub repository_url: String,
    pub branch: BranchRename,
    pub rename: Vec<RenameSpec>,
    pub security: FeatureRemovalSpec,
    pub advisories: Vec<String>,
}

impl TemplateManifest {
    pub fn builder() -> TemplateManifestBuilder {
        TemplateManifestBuilder::default()
    }

    /// Render the rename steps for a project.
    pub fn rename_steps(&self, ctx: &RenderContext) -> Result<Vec<RenameStep>, DomainError> {
        self.rename
            .iter()
            .map(|spec| -> Result<RenameStep, DomainError> {
                match spec {
                    RenameSpec::Replace {
                        path,
                        search,
                        replace,
                    } => Ok(RenameStep::Replace(ReplacementRule::new(
                        RelativePath::try_new(ctx.render(path))?,
                        ctx.render(search),
                        ctx.render(replace),
                    ))),
                    RenameSpec::Move { from, to } => Ok(RenameStep::Move {
                        from: RelativePath::try_new(ctx.render(from))?,
                        to: RelativePath::try_new(ctx.render(to))?,
                    }),
                }
            })
            .collect()
    }

    /// Resolve the security removal table against a project root, threading
    /// every path through the relocations made while preparing.
    pub fn removal_set(
        &self,
        ctx: &RenderContext,
        root: &Path,
        ledger: &RelocationLedger,
    ) -> Result<RemovalSet, DomainError> {
        let resolve = |raw: &str| -> Result<std::path::PathBuf, DomainError> {
            let rel = RelativePath::try_new(ctx.render(raw))?;
            Ok(root.join(ledger.resolve(rel.as_path())))
        };

        let spec = &self.security;
        Ok(RemovalSet {
            directories: spec
                .directories
                .iter()
                .map(|d| resolve(d.as_str()))
                .collect::<Result<_, _>>()?,
            files: spec
                .files
                .iter()
                .map(|f| resolve(f.as_str()))
                .collect::<Result<_, _>>()?,
            line_filters: spec
                .line_filters
                .iter()
                .map(|lf| -> Result<LineFilter, DomainError> {
                    Ok(LineFilter {
                        path: resolve(lf.path.as_str())?,
                        needles: lf.needles.iter().map(|n| ctx.render(n)).collect(),
                    })
                })
                .collect::<Result<_, _>>()?,
            block_removals: spec
                .block_removals
                .iter()
                .map(|br| -> Result<BlockRemoval, DomainError> {
                    Ok(BlockRemoval {
                        path: resolve(br.path.as_str())?,
                        blocks: br.blocks.iter().map(|b| ctx.render(b)).collect(),
                    })
                })
                .collect::<Result<_, _>>()?,
        })
    }

    /// Advisories for the terminal progress event, rendered for a project.
    pub fn advisories(&self, ctx: &RenderContext) -> Vec<String> {
        self.advisories.iter().map(|a| ctx.render(a)).collect()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.repository_url.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "repository_url",
            });
        }
        if self.branch.from.trim().is_empty() || self.branch.to.trim().is_empty() {
            return Err(DomainError::InvalidManifest(
                "branch names cannot be empty".into(),
            ));
        }
        if self.rename.is_empty() {
            return Err(DomainError::InvalidManifest(
                "at least one rename step is required".into(),
            ));
        }

        // Rename steps: well-formed paths, each (path, token) once.
        let mut rules = HashSet::new();
        let mut rename_paths = Vec::new();
        for spec in &self.rename {
            match spec {
                RenameSpec::Replace { path, search, .. } => {
                    if search.is_empty() {
                        return Err(DomainError::InvalidManifest(format!(
                            "empty search token for {path}"
                        )));
                    }
                    if !rules.insert((path.as_str(), search.as_str())) {
                        return Err(DomainError::DuplicateRule {
                            path: path.clone(),
                            token: search.clone(),
                        });
                    }
                    rename_paths.push(RelativePath::try_new(path.as_str())?);
                }
                RenameSpec::Move { from, to } => {
                    rename_paths.push(RelativePath::try_new(from.as_str())?);
                    rename_paths.push(RelativePath::try_new(to.as_str())?);
                }
            }
        }

        // Removal targets: each listed once, none nested in another, none
        // touching a rename path.
        let spec = &self.security;
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for raw in spec.directories.iter().chain(&spec.files) {
            if !seen.insert(raw.as_str()) {
                return Err(DomainError::DuplicateRemoval { path: raw.clone() });
            }
            targets.push(RelativePath::try_new(raw.as_str())?);
        }

        for (i, target) in targets.iter().enumerate() {
            let nested = spec
                .directories
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .any(|(_, dir)| target.as_path().starts_with(dir));
            let touches_rename = rename_paths.iter().any(|p| p.is_within(target));
            if nested || touches_rename {
                return Err(DomainError::OverlappingRemoval {
                    path: target.to_string(),
                });
            }
        }

        let edited = spec
            .line_filters
            .iter()
            .map(|lf| lf.path.as_str())
            .chain(spec.block_removals.iter().map(|br| br.path.as_str()));
        for raw in edited {
            let path = RelativePath::try_new(raw)?;
            if targets.iter().any(|t| path.is_within(t)) {
                return Err(DomainError::OverlappingRemoval { path: raw.into() });
            }
        }

        Ok(())
    }
}

/// Builder for [`TemplateManifest`].
#[derive(Debug, Default)]
pub struct TemplateManifestBuilder {
    id: Option<TemplateId>,
    repository_url: Option<String>,
    branch: Option<BranchRename>,
    rename: Vec<RenameSpec>,
    security: FeatureRemovalSpec,
    advisories: Vec<String>,
}

impl TemplateManifestBuilder {
    pub fn id(mut self, id: TemplateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }

    pub fn branch(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.branch = Some(BranchRename {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn replace(
        mut self,
        path: impl Into<String>,
        search: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        self.rename.push(RenameSpec::Replace {
            path: path.into(),
            search: search.into(),
            replace: replace.into(),
        });
        self
    }

    pub fn move_path(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename.push(RenameSpec::Move {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn rename_step(mut self, spec: RenameSpec) -> Self {
        self.rename.push(spec);
        self
    }

    pub fn security(mut self, security: FeatureRemovalSpec) -> Self {
        self.security = security;
        self
    }

    pub fn advisory(mut self, advisory: impl Into<String>) -> Self {
        self.advisories.push(advisory.into());
        self
    }

    pub fn build(self) -> Result<TemplateManifest, DomainError> {
        let manifest = TemplateManifest {
            id: self.id.ok_or(DomainError::MissingRequiredField { field: "id" })?,
            repository_url: self
                .repository_url
                .ok_or(DomainError::MissingRequiredField {
                    field: "repository_url",
                })?,
            branch: self.branch.unwrap_or_else(|| BranchRename {
                from: "master".into(),
                to: "main".into(),
            }),
            rename: self.rename,
            security: self.security,
            advisories: self.advisories,
        };
        manifest.validate()?;
        Ok(manifest)
    }
}
