// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (events and results are passed around by value)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid template manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid template id '{0}': expected 'name@version'")]
    InvalidTemplateId(String),

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Rule replacing '{token}' in {path} is declared more than once")]
    DuplicateRule { path: String, token: String },

    #[error("Path {path} is listed more than once for removal")]
    DuplicateRemoval { path: String },

    #[error("Removal target {path} overlaps a path used by the rename steps")]
    OverlappingRemoval { path: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use letters, digits, hyphens, underscores and spaces".into(),
                "Examples: sample, my-shop, inventory_api".into(),
            ],
            Self::InvalidManifest(msg) => vec![
                "The template manifest could not be used".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidTemplateId(id) => vec![
                format!("'{}' is not a valid template id", id),
                "Template ids look like: core-template@1.0.0".into(),
            ],
            Self::DuplicateRule { .. }
            | Self::DuplicateRemoval { .. }
            | Self::OverlappingRemoval { .. } => vec![
                "The template manifest is inconsistent".into(),
                "Each rename rule and removal target must appear once".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::InvalidTemplateId(_) => {
                ErrorCategory::Validation
            }
            Self::InvalidManifest(_)
            | Self::DuplicateRule { .. }
            | Self::DuplicateRemoval { .. }
            | Self::OverlappingRemoval { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Manifest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Manifest,
}
