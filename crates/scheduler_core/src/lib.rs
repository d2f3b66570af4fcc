//! Scheduling core: task storage, calendar projection and date normalization.
//! This crate is the single source of truth for end-date conventions.

pub mod dates;
pub mod db;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod repo;
pub mod service;

pub use dates::{DateResult, InvalidDateError};
pub use error::{CoreError, CoreResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mapper::{CreateTaskInput, StorageDates, UpdateDatesInput};
pub use model::event::{CalendarEvent, EventExtendedProps};
pub use model::project::{Assignment, Project, ProjectId};
pub use model::task::{Task, TaskId, TaskStatus, TaskValidationError};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{DateChange, SqliteTaskRepository, TaskRecord, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::event_query_service::EventQueryService;
pub use service::project_service::ProjectService;
pub use service::task_service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
