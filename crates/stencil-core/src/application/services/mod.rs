//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "scaffold a project" or "describe a template".

pub mod relocator;
pub mod scaffold_pipeline;
pub mod stripper;
pub mod template_service;

pub use relocator::TextRelocator;
pub use scaffold_pipeline::{ScaffoldPipeline, ScaffoldPlan, ScaffoldRun};
pub use stripper::{FeatureStripper, StripSummary};
pub use template_service::{TemplateInfo, TemplateService};
