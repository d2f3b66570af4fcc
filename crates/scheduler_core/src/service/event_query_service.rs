//! Calendar event read use case.

use crate::error::CoreResult;
use crate::mapper;
use crate::model::event::CalendarEvent;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use log::debug;

/// Produces the calendar event list from stored tasks.
pub struct EventQueryService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> EventQueryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every task as an all-day calendar event.
    ///
    /// Computed fresh on every call. Order follows storage and is not part of
    /// the contract. Stored dates that cannot be projected are a `Storage`
    /// error, never an input error.
    pub fn list_events(&self) -> CoreResult<Vec<CalendarEvent>> {
        let records = self.repo.list_tasks_with_projects()?;
        let events = records
            .iter()
            .map(|record| {
                // Only a stored end on the last representable day fails here.
                mapper::to_calendar_event(&record.task, &record.project).map_err(|err| {
                    RepoError::InvalidData(format!(
                        "task {} cannot be projected: {err}",
                        record.task.id
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "event=events_list module=service status=ok count={}",
            events.len()
        );
        Ok(events)
    }
}
