//! Use-case error taxonomy shared by the mapper and services.
//!
//! # Invariants
//! - Repository `NotFound` surfaces as `NotFound`, never as `Storage`.
//! - `Storage` carries the collaborator failure for logging only. Boundaries
//!   must not echo its detail to clients.

use crate::dates::InvalidDateError;
use crate::model::task::{TaskId, TaskValidationError};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug)]
pub enum CoreError {
    /// Missing or malformed required input.
    Validation(TaskValidationError),
    /// Date text that does not parse to a calendar date.
    InvalidDate(InvalidDateError),
    /// Identifier does not resolve to a task row.
    NotFound(TaskId),
    /// Storage collaborator failure.
    Storage(RepoError),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidDate(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for CoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<InvalidDateError> for CoreError {
    fn from(value: InvalidDateError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::UnknownProject(project_id) => {
                Self::Validation(TaskValidationError::UnknownProject(project_id))
            }
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}
