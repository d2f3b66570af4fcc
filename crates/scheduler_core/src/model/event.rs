//! Calendar event view model.
//!
//! Built fresh on every read and discarded after rendering.

use crate::model::task::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Event shape consumed by the calendar widget.
///
/// Serialized as camelCase JSON with RFC 3339 UTC boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: TaskId,
    /// `"{project name}: {task title}"`.
    pub title: String,
    pub start: DateTime<Utc>,
    /// Exclusive when `all_day` is true: the day after the last occupied day.
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub extended_props: EventExtendedProps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventExtendedProps {
    pub status: TaskStatus,
    pub progress: Option<f64>,
}
