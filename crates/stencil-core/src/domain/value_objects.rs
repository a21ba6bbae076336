//! Domain value objects: ProjectName, TemplateId.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. They
//! validate on construction so that the rest of the pipeline can assume a
//! well-formed name and a well-formed template identifier.

use crate::domain::{error::DomainError, naming};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ProjectName ──────────────────────────────────────────────────────────────

/// Characters that are rejected on at least one major platform.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// A user-supplied project name that is safe to use as a directory name.
///
/// Invariant: non-empty, no path separators, does not start with `.` or `-`, and
/// contains at least one alphanumeric character so that both derived case
/// forms are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    /// Parse and validate a project name.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = raw.as_ref();
        let name = raw.trim();

        let reject = |reason: &str| {
            Err(DomainError::InvalidProjectName {
                name: raw.to_string(),
                reason: reason.to_string(),
            })
        };

        if name.is_empty() {
            return reject("name cannot be empty");
        }
        if name.starts_with('.') {
            return reject("name cannot start with '.'");
        }
        if name.starts_with('-') {
            return reject("name cannot start with '-'");
        }
        if name.contains(FORBIDDEN_CHARS) {
            return reject("name cannot contain path separators or reserved characters");
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' ')))
        {
            return reject(&format!("unsupported character '{c}'"));
        }
        if !name.chars().any(|c| c.is_ascii_alphanumeric()) {
            return reject("name must contain at least one letter or digit");
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `MyShop` for `my-shop`.
    pub fn pascal_case(&self) -> String {
        naming::to_pascal_case(&self.0)
    }

    /// `myShop` for `my-shop`.
    pub fn camel_case(&self) -> String {
        naming::to_camel_case(&self.0)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProjectName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProjectName> for String {
    fn from(name: ProjectName) -> Self {
        name.0
    }
}

// ── TemplateId ───────────────────────────────────────────────────────────────

/// Identifier of a template manifest.
///
/// ## Format
///
/// Human-readable: `name@version` (e.g., `core-template@1.0.0`)
///
/// The version is stored as an opaque string. Manifests are keyed by this id
/// so that each template snapshot carries its own rename and removal tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId {
    name: String,
    version: String,
}

impl TemplateId {
    /// Build an id from its parts. Neither part may be empty or contain `@`.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self, DomainError> {
        let (name, version) = (name.into(), version.into());
        if name.is_empty() || version.is_empty() || name.contains('@') || version.contains('@') {
            return Err(DomainError::InvalidTemplateId(format!("{name}@{version}")));
        }
        Ok(Self { name, version })
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.split_once('@') {
            Some((name, version)) => Self::new(name, version),
            None => Err(DomainError::InvalidTemplateId(s.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

impl FromStr for TemplateId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
