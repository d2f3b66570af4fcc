//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its status lifecycle.
//! - Validate record-level invariants before writes and after reads.
//!
//! # Invariants
//! - `TaskId` is the one identifier type for create, read and update.
//! - `end_date` is inclusive and never earlier than `start_date`.

use crate::model::project::ProjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable task identifier.
///
/// New tasks receive a UUID v4 string. Identifiers coming from clients are
/// kept verbatim, so numeric ids are carried as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh identifier for a new task.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Todo,
    InProgress,
    Done,
    /// No longer actionable.
    Cancelled,
}

impl TaskStatus {
    /// Returns the storage/wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a storage/wire label; `None` for unknown text.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Persisted task row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub project_id: ProjectId,
    /// First occupied calendar day.
    pub start_date: NaiveDate,
    /// Last occupied calendar day (inclusive).
    pub end_date: NaiveDate,
    pub status: TaskStatus,
    pub progress: Option<f64>,
    pub is_all_day: bool,
}

impl Task {
    /// Validates record-level invariants.
    ///
    /// # Errors
    /// - `BlankTitle` when the title is empty after trimming.
    /// - `EndBeforeStart` when the inclusive range is inverted.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TaskValidationError::MissingField("id"));
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        check_date_range(self.start_date, self.end_date)
    }
}

/// Rejects inclusive ranges whose end precedes their start.
pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), TaskValidationError> {
    if end < start {
        return Err(TaskValidationError::EndBeforeStart { start, end });
    }
    Ok(())
}

/// Validation failure for task input or task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Required field absent (or blank) in the request.
    MissingField(&'static str),
    BlankTitle,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    UnknownStatus(String),
    /// Referenced project does not exist.
    UnknownProject(ProjectId),
    /// Field present but of an unusable shape.
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::BlankTitle => write!(f, "title cannot be blank"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "end date {end} is earlier than start date {start}")
            }
            Self::UnknownStatus(value) => write!(f, "unknown task status: `{value}`"),
            Self::UnknownProject(id) => write!(f, "unknown project: {id}"),
            Self::InvalidField { field, reason } => write!(f, "invalid field {field}: {reason}"),
        }
    }
}

impl Error for TaskValidationError {}
