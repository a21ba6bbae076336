//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldPipeline, TemplateService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Those live in `crate::domain`.

pub mod cancellation;
pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    FeatureStripper, ScaffoldPipeline, ScaffoldPlan, ScaffoldRun, StripSummary, TemplateInfo,
    TemplateService, TextRelocator,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ManifestStore, VersionControl};

pub use cancellation::CancellationToken;
pub use error::ApplicationError;
