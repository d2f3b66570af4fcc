//! Project and assignment entities.
//!
//! Both are read-only from the scheduling core, except for project seeding.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};

/// SQLite integer primary key of `projects`.
pub type ProjectId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

/// One person assigned to a task.
///
/// Fetched with the event listing but not projected into calendar events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub task_id: TaskId,
    pub assignee: String,
}
