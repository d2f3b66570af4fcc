//! Task write use cases.
//!
//! # Responsibility
//! - Validate and normalize task creation input.
//! - Apply calendar drag/resize edits to stored task dates.
//!
//! # Invariants
//! - Every date reaching storage went through [`crate::dates`].
//! - `update_dates` never rewrites fields other than the date columns.
//! - Each operation makes exactly one storage call and writes at most one
//!   task row.

use crate::dates;
use crate::error::{CoreError, CoreResult};
use crate::mapper::{self, CreateTaskInput, StorageDates, UpdateDatesInput};
use crate::model::task::{Task, TaskId, TaskStatus, TaskValidationError};
use crate::repo::task_repo::{DateChange, TaskRepository};
use log::{info, warn};
use std::time::Instant;

/// Task write service over a storage collaborator.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one all-day task and returns its identifier.
    ///
    /// # Contract
    /// - `title`, `start_date` and `project_id` are required.
    /// - `end_date` is an inclusive calendar day; absent means `start_date`.
    /// - Both dates are snapped to their UTC day.
    /// - `status` defaults to `todo`.
    pub fn create(&self, input: &CreateTaskInput) -> CoreResult<TaskId> {
        let title = required(input.title.as_deref(), "title")?;
        let start_raw = required(input.start_date.as_deref(), "startDate")?;
        let project_id = input
            .project_id
            .ok_or(TaskValidationError::MissingField("projectId"))?;

        let start = dates::snap_to_start_of_day(dates::parse_instant(start_raw)?);
        let end = dates::to_inclusive_end(input.end_date.as_deref(), false)?
            .map_or(start, dates::snap_to_start_of_day);

        let status = match input.status.as_deref() {
            Some(raw) => TaskStatus::parse(raw)
                .ok_or_else(|| TaskValidationError::UnknownStatus(raw.to_string()))?,
            None => TaskStatus::default(),
        };

        let task = Task {
            id: TaskId::generate(),
            title: title.to_string(),
            project_id,
            start_date: dates::calendar_day(start),
            end_date: dates::calendar_day(end),
            status,
            progress: None,
            is_all_day: true,
        };
        task.validate()?;

        let started_at = Instant::now();
        match self.repo.create_task(&task) {
            Ok(created) => {
                info!(
                    "event=task_create module=service status=ok project_id={} duration_ms={}",
                    created.project_id,
                    started_at.elapsed().as_millis()
                );
                Ok(created.id)
            }
            Err(err) => {
                let err = CoreError::from(err);
                warn!("event=task_create module=service status=error error={err}");
                Err(err)
            }
        }
    }

    /// Moves or resizes a task from a calendar edit and returns its identifier.
    ///
    /// # Contract
    /// - `id` and `start` are required; `all_day` defaults per
    ///   [`mapper::DEFAULT_ALL_DAY`].
    /// - An end left unchanged must not precede the new start.
    /// - Unknown `id` fails with `NotFound`.
    pub fn update_dates(&self, input: &UpdateDatesInput) -> CoreResult<TaskId> {
        self.apply_edit(&mapper::to_storage_dates(input)?)
    }

    /// Writes already-normalized edit dates in one storage call.
    pub fn apply_edit(&self, storage: &StorageDates) -> CoreResult<TaskId> {
        let change = DateChange {
            start_date: storage.start_date,
            end_date: storage.end_date,
        };
        let started_at = Instant::now();
        match self.repo.update_task_dates(&storage.id, &change) {
            Ok(updated) => {
                info!(
                    "event=task_update module=service status=ok all_day={} end_changed={} duration_ms={}",
                    storage.all_day,
                    change.end_date.is_some(),
                    started_at.elapsed().as_millis()
                );
                Ok(updated.id)
            }
            Err(err) => {
                let err = CoreError::from(err);
                warn!("event=task_update module=service status=error error={err}");
                Err(err)
            }
        }
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, TaskValidationError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(TaskValidationError::MissingField(field)),
    }
}
