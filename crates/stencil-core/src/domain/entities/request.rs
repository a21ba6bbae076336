use crate::domain::value_objects::ProjectName;

/// A validated request to scaffold one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    project_name: ProjectName,
    include_security: bool,
}

impl ScaffoldRequest {
    pub fn new(project_name: ProjectName, include_security: bool) -> Self {
        Self {
            project_name,
            include_security,
        }
    }

    pub fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    pub fn include_security(&self) -> bool {
        self.include_security
    }
}
