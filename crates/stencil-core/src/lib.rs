//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stencil
//! project scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stencil-cli (CLI)             │
//! │   (drives runs, renders progress)       │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldPipeline, TextRelocator,      │
//! │   FeatureStripper, TemplateService)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, VersionControl, Manifests) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stencil-adapters (Infrastructure)    │
//! │  (LocalFilesystem, GitCli, manifests)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProjectName, TemplateManifest, Phase)  │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stencil_core::prelude::*;
//!
//! let request = ScaffoldRequest::new(ProjectName::parse("sample")?, true);
//! let pipeline = ScaffoldPipeline::new(filesystem, vcs, manifest);
//!
//! for event in pipeline.run(request, "./", CancellationToken::new()) {
//!     println!("{}", event?.status_message);
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CancellationToken, ScaffoldPipeline, ScaffoldPlan, ScaffoldRun, TemplateInfo,
        TemplateService,
        ports::{Filesystem, ManifestStore, VersionControl},
    };
    pub use crate::domain::{
        Phase, ProgressEvent, ProjectName, RenderContext, ScaffoldRequest, TemplateId,
        TemplateManifest,
    };
    pub use crate::error::{StencilError, StencilResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
