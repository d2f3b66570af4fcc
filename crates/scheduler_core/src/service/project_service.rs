//! Project listing and seeding.

use crate::error::CoreResult;
use crate::model::project::Project;
use crate::model::task::TaskValidationError;
use crate::repo::project_repo::ProjectRepository;

pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists projects ordered by id ascending.
    pub fn list_projects(&self) -> CoreResult<Vec<Project>> {
        Ok(self.repo.list_projects()?)
    }

    /// Creates a project with a trimmed, non-blank name.
    pub fn create_project(&self, name: &str) -> CoreResult<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaskValidationError::MissingField("name").into());
        }
        Ok(self.repo.create_project(name)?)
    }
}
