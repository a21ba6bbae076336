use crate::domain::{entities::manifest::TemplateManifest, error::DomainError};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_manifest(manifest: &TemplateManifest) -> Result<(), DomainError> {
        manifest.validate()
    }
}
