// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stencil.
//!
//! This module contains pure logic with no I/O. Filesystem and version
//! control access happen through the ports defined in the application layer.
//!
//! - **Naming**: project name validation and case conversion
//! - **Manifest**: the declarative rename/removal tables of a template
//! - **Rules**: the resolved steps the services execute
//! - **Progress**: the events a scaffold run reports
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod naming;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    common::RelativePath,
    manifest::{
        BlockRemovalSpec, BranchRename, FeatureRemovalSpec, LineFilterSpec, RenameSpec,
        TemplateManifest, TemplateManifestBuilder,
    },
    progress::{Phase, ProgressEvent},
    request::ScaffoldRequest,
    rules::{BlockRemoval, LineFilter, RelocationLedger, RemovalSet, RenameStep, ReplacementRule},
};

pub use error::{DomainError, ErrorCategory};
pub use naming::{RenderContext, to_camel_case, to_pascal_case};
pub use validation::DomainValidator;
pub use value_objects::{ProjectName, TemplateId};

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Project Name Tests
    // ========================================================================

    #[test]
    fn project_name_accepts_common_forms() {
        for name in ["sample", "my-shop", "order_service", "Inventory API", "app2"] {
            assert!(ProjectName::parse(name).is_ok(), "rejected: {name}");
        }
    }

    #[test]
    fn project_name_trims_whitespace() {
        let name = ProjectName::parse("  demo  ").unwrap();
        assert_eq!(name.as_str(), "demo");
    }

    #[test]
    fn project_name_rejects_empty() {
        assert!(matches!(
            ProjectName::parse("   "),
            Err(DomainError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn project_name_rejects_dotfile_and_traversal() {
        assert!(ProjectName::parse(".hidden").is_err());
        assert!(ProjectName::parse("..").is_err());
        assert!(ProjectName::parse("a/b").is_err());
        assert!(ProjectName::parse("a\\b").is_err());
    }

    #[test]
    fn project_name_rejects_option_like_names() {
        for name in ["--bare", "--mirror", "-x", " -demo"] {
            assert!(
                matches!(
                    ProjectName::parse(name),
                    Err(DomainError::InvalidProjectName { ref reason, .. }) if reason.contains("'-'")
                ),
                "accepted: {name}"
            );
        }
        assert!(ProjectName::parse("demo-app").is_ok());
    }

    #[test]
    fn project_name_rejects_reserved_and_symbol_only() {
        assert!(ProjectName::parse("what?").is_err());
        assert!(ProjectName::parse("na.me").is_err());
        assert!(ProjectName::parse("---").is_err());
    }

    #[test]
    fn project_name_case_forms() {
        let name = ProjectName::parse("sample").unwrap();
        assert_eq!(name.pascal_case(), "Sample");
        assert_eq!(name.camel_case(), "sample");

        let name = ProjectName::parse("order service").unwrap();
        assert_eq!(name.pascal_case(), "OrderService");
        assert_eq!(name.camel_case(), "orderService");
    }

    // ========================================================================
    // Template Id Tests
    // ========================================================================

    #[test]
    fn template_id_parsing() {
        let id = TemplateId::parse("core-template@1.0.0").unwrap();
        assert_eq!(id.name(), "core-template");
        assert_eq!(id.version(), "1.0.0");
        assert_eq!(id.to_string(), "core-template@1.0.0");

        assert!(TemplateId::parse("invalid").is_err());
        assert!(TemplateId::parse("too@many@ats").is_err());
        assert!(TemplateId::parse("@1.0.0").is_err());
    }

    #[test]
    fn template_id_rejects_at_in_name() {
        assert!(TemplateId::new("invalid@name", "1.0.0").is_err());
        assert!(TemplateId::new("core-template", "").is_err());
        assert_eq!(
            TemplateId::new("core-template", "1.0.0").unwrap(),
            TemplateId::parse("core-template@1.0.0").unwrap()
        );
    }

    // ========================================================================
    // Relative Path Tests
    // ========================================================================

    #[test]
    fn relative_path_rejects_escapes() {
        assert!(RelativePath::try_new("../outside").is_err());
        assert!(RelativePath::try_new("/abs").is_err());
        assert!(RelativePath::try_new("").is_err());
        assert!(RelativePath::try_new("src/app").is_ok());
    }

    #[test]
    fn relative_path_containment() {
        let dir = RelativePath::try_new("src/app").unwrap();
        let file = RelativePath::try_new("src/app/main.cs").unwrap();
        let sibling = RelativePath::try_new("src/application").unwrap();

        assert!(file.is_within(&dir));
        assert!(dir.is_within(&dir));
        assert!(!sibling.is_within(&dir));
    }
}
