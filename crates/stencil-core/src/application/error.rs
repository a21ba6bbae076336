//! Application layer errors.
//!
//! These errors represent failures while executing a scaffold run, not
//! business rule violations. Business rule errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while the pipeline drives its ports.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Filesystem operation failed (missing source, existing destination,
    /// permission denied...).
    #[error("Filesystem error at {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    /// An external command could not be started or exited unsuccessfully.
    #[error("Command `{command}` failed: {reason}")]
    Subprocess { command: String, reason: String },

    /// File content is not valid UTF-8.
    #[error("File is not valid UTF-8: {path}")]
    Encoding { path: PathBuf },

    /// No manifest is registered under the requested template id.
    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    /// The run was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,
}

impl ApplicationError {
    pub fn io(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Io { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "A failed run leaves a partial project behind; remove it before retrying".into(),
            ],
            Self::Subprocess { command, .. } => vec![
                format!("Command failed: {}", command),
                "Make sure git is installed and on your PATH".into(),
                "Check your network connection and that the project directory does not exist yet"
                    .into(),
            ],
            Self::Encoding { path } => vec![
                format!("{} could not be decoded as UTF-8", path.display()),
                "The template snapshot may have changed; check the template manifest".into(),
            ],
            Self::TemplateNotFound { id } => vec![
                format!("No built-in template is named '{}'", id),
                "Try: stencil template to see the available template".into(),
            ],
            Self::Cancelled => vec!["The run was interrupted; the project may be incomplete".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io { .. } | Self::Encoding { .. } => ErrorCategory::Internal,
            Self::Subprocess { .. } => ErrorCategory::External,
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }
}
