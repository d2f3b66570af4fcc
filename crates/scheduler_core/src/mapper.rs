//! Mapping between stored task records and calendar-widget payloads.
//!
//! # Responsibility
//! - Project a stored task plus its project into a `CalendarEvent`.
//! - Resolve edit/create payload fields from their accepted aliases.
//! - Convert resolved edit input into storage dates via [`crate::dates`].
//!
//! # Invariants
//! - Alias resolution is first-non-null-match-wins over a fixed ordered list.
//! - Absent `allDay` resolves to [`DEFAULT_ALL_DAY`].
//! - Reads always project tasks as all-day events.

use crate::dates::{self, DateResult};
use crate::error::CoreResult;
use crate::model::event::{CalendarEvent, EventExtendedProps};
use crate::model::project::{Project, ProjectId};
use crate::model::task::{check_date_range, Task, TaskId, TaskValidationError};
use chrono::NaiveDate;
use serde_json::Value;

/// Accepted key paths per logical edit field, in resolution order.
pub const EDIT_ID_KEYS: &[&str] = &["id", "eventId", "event.id"];
pub const EDIT_START_KEYS: &[&str] = &["start", "startStr", "startISO", "event.start", "event.startStr"];
pub const EDIT_END_KEYS: &[&str] = &["end", "endStr", "endISO", "event.end", "event.endStr"];
pub const EDIT_ALL_DAY_KEYS: &[&str] = &["allDay", "event.allDay", "isAllDay"];

/// Accepted key paths per logical create field, in resolution order.
pub const CREATE_TITLE_KEYS: &[&str] = &["title", "name"];
pub const CREATE_START_KEYS: &[&str] = &["startDate", "start_date"];
pub const CREATE_END_KEYS: &[&str] = &["endDate", "end_date"];
pub const CREATE_PROJECT_KEYS: &[&str] = &["projectId", "project_id"];
pub const CREATE_STATUS_KEYS: &[&str] = &["status"];

/// `allDay` value used when an edit payload does not carry one.
pub const DEFAULT_ALL_DAY: bool = false;

/// Date-edit request with aliases already resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDatesInput {
    pub id: Option<TaskId>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub all_day: Option<bool>,
}

impl UpdateDatesInput {
    /// Resolves edit fields from a flat or nested (`event.*`) payload.
    ///
    /// # Errors
    /// - `InvalidField` when a present field has an unusable JSON type.
    pub fn from_payload(payload: &Value) -> Result<Self, TaskValidationError> {
        Ok(Self {
            id: identifier_field(pick(payload, EDIT_ID_KEYS), "id")?.map(TaskId::from),
            start: text_field(pick(payload, EDIT_START_KEYS), "start")?,
            end: text_field(pick(payload, EDIT_END_KEYS), "end")?,
            all_day: flag_field(pick(payload, EDIT_ALL_DAY_KEYS), "allDay")?,
        })
    }
}

/// Task-create request with aliases already resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskInput {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub project_id: Option<ProjectId>,
    pub status: Option<String>,
}

impl CreateTaskInput {
    /// Resolves create fields from a flat payload.
    ///
    /// # Errors
    /// - `InvalidField` when a present field has an unusable JSON type.
    pub fn from_payload(payload: &Value) -> Result<Self, TaskValidationError> {
        let project_id = match identifier_field(pick(payload, CREATE_PROJECT_KEYS), "projectId")? {
            Some(raw) => Some(raw.parse::<ProjectId>().map_err(|_| {
                TaskValidationError::InvalidField {
                    field: "projectId",
                    reason: format!("`{raw}` is not an integer"),
                }
            })?),
            None => None,
        };

        Ok(Self {
            title: text_field(pick(payload, CREATE_TITLE_KEYS), "title")?,
            start_date: text_field(pick(payload, CREATE_START_KEYS), "startDate")?,
            end_date: text_field(pick(payload, CREATE_END_KEYS), "endDate")?,
            project_id,
            status: text_field(pick(payload, CREATE_STATUS_KEYS), "status")?,
        })
    }
}

/// Storage-facing result of a date edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDates {
    pub id: TaskId,
    pub start_date: NaiveDate,
    /// Inclusive end; `None` leaves the stored end untouched.
    pub end_date: Option<NaiveDate>,
    pub all_day: bool,
}

/// Projects a stored task and its project into a calendar event.
///
/// # Errors
/// - [`crate::dates::InvalidDateError`] only when the stored end is the last
///   representable day.
pub fn to_calendar_event(task: &Task, project: &Project) -> DateResult<CalendarEvent> {
    let end = dates::to_exclusive_end(dates::day_start(task.end_date), true)?;
    Ok(CalendarEvent {
        id: task.id.clone(),
        title: format!("{}: {}", project.name, task.title),
        start: dates::day_start(task.start_date),
        end,
        all_day: true,
        extended_props: EventExtendedProps {
            status: task.status,
            progress: task.progress,
        },
    })
}

/// Resolves and converts an edit payload in one step.
pub fn from_edit_payload(payload: &Value) -> CoreResult<StorageDates> {
    let input = UpdateDatesInput::from_payload(payload)?;
    to_storage_dates(&input)
}

/// Converts resolved edit input into storage dates.
///
/// - All-day: start snapped to its UTC day; end shifted from exclusive to
///   inclusive; absent end means a single-day range.
/// - Timed: start/end reduced to their UTC day without shifting; absent end
///   is left absent.
///
/// # Errors
/// - `Validation(MissingField)` for absent `id` or `start`.
/// - `InvalidDate` for unparseable `start` or `end`.
/// - `Validation(EndBeforeStart)` when the resulting range is inverted.
pub fn to_storage_dates(input: &UpdateDatesInput) -> CoreResult<StorageDates> {
    let id = input
        .id
        .clone()
        .ok_or(TaskValidationError::MissingField("id"))?;
    let start_raw = input
        .start
        .as_deref()
        .ok_or(TaskValidationError::MissingField("start"))?;
    let all_day = input.all_day.unwrap_or(DEFAULT_ALL_DAY);

    let start = dates::parse_instant(start_raw)?;
    let end = dates::to_inclusive_end(input.end.as_deref(), all_day)?;

    let (start_date, end_date) = if all_day {
        let start_date = dates::calendar_day(dates::snap_to_start_of_day(start));
        let end_date = end.map_or(start_date, dates::calendar_day);
        (start_date, Some(end_date))
    } else {
        (dates::calendar_day(start), end.map(dates::calendar_day))
    };

    if let Some(end_date) = end_date {
        check_date_range(start_date, end_date)?;
    }

    Ok(StorageDates {
        id,
        start_date,
        end_date,
        all_day,
    })
}

/// Returns the first non-null value found along `paths`.
///
/// Each path is a dot-separated list of object keys.
pub fn pick<'v>(payload: &'v Value, paths: &[&str]) -> Option<&'v Value> {
    paths.iter().find_map(|path| {
        let mut current = payload;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        (!current.is_null()).then_some(current)
    })
}

fn text_field(value: Option<&Value>, field: &'static str) -> Result<Option<String>, TaskValidationError> {
    match value {
        None => Ok(None),
        Some(Value::String(text)) => Ok(non_blank(text)),
        Some(other) => Err(invalid_type(field, other, "a string")),
    }
}

fn identifier_field(
    value: Option<&Value>,
    field: &'static str,
) -> Result<Option<String>, TaskValidationError> {
    match value {
        None => Ok(None),
        Some(Value::String(text)) => Ok(non_blank(text)),
        Some(Value::Number(number)) if number.is_i64() || number.is_u64() => {
            Ok(Some(number.to_string()))
        }
        Some(other) => Err(invalid_type(field, other, "a string or integer")),
    }
}

fn flag_field(value: Option<&Value>, field: &'static str) -> Result<Option<bool>, TaskValidationError> {
    match value {
        None => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(TaskValidationError::InvalidField {
                field,
                reason: format!("`{text}` is not a boolean"),
            }),
        },
        Some(Value::Number(number)) => match number.as_u64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(TaskValidationError::InvalidField {
                field,
                reason: format!("`{number}` is not a boolean"),
            }),
        },
        Some(other) => Err(invalid_type(field, other, "a boolean")),
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn invalid_type(field: &'static str, value: &Value, expected: &str) -> TaskValidationError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    TaskValidationError::InvalidField {
        field,
        reason: format!("expected {expected}, found {found}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        from_edit_payload, pick, to_calendar_event, to_storage_dates, CreateTaskInput,
        UpdateDatesInput, EDIT_START_KEYS,
    };
    use crate::error::CoreError;
    use crate::model::project::Project;
    use crate::model::task::{Task, TaskId, TaskStatus, TaskValidationError};
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn stored_task() -> Task {
        Task {
            id: TaskId::new("T1"),
            title: "Framing".to_string(),
            project_id: 7,
            start_date: date(2024, 3, 10),
            end_date: date(2024, 3, 12),
            status: TaskStatus::InProgress,
            progress: Some(40.0),
            is_all_day: true,
        }
    }

    #[test]
    fn calendar_event_uses_exclusive_end_and_project_title() {
        let project = Project {
            id: 7,
            name: "Harbor House".to_string(),
        };
        let event = to_calendar_event(&stored_task(), &project).expect("event");

        assert_eq!(event.title, "Harbor House: Framing");
        assert_eq!(event.start.date_naive(), date(2024, 3, 10));
        assert_eq!(event.end.date_naive(), date(2024, 3, 13));
        assert!(event.all_day);
        assert_eq!(event.extended_props.status, TaskStatus::InProgress);
        assert_eq!(event.extended_props.progress, Some(40.0));
    }

    #[test]
    fn calendar_event_serializes_for_the_widget() {
        let project = Project {
            id: 7,
            name: "Harbor House".to_string(),
        };
        let event = to_calendar_event(&stored_task(), &project).expect("event");
        let wire = serde_json::to_value(&event).expect("serialize event");

        assert_eq!(wire["id"], "T1");
        assert_eq!(wire["start"], "2024-03-10T00:00:00Z");
        assert_eq!(wire["end"], "2024-03-13T00:00:00Z");
        assert_eq!(wire["allDay"], true);
        assert_eq!(wire["extendedProps"]["status"], "in_progress");
        assert_eq!(wire["extendedProps"]["progress"], 40.0);
    }

    #[test]
    fn pick_prefers_earlier_aliases_and_skips_nulls() {
        let payload = json!({
            "start": null,
            "startStr": "2024-03-10",
            "event": { "start": "2024-04-01" }
        });
        assert_eq!(
            pick(&payload, EDIT_START_KEYS).and_then(|v| v.as_str()),
            Some("2024-03-10")
        );
        assert!(pick(&json!({ "event": "flat" }), &["event.start"]).is_none());
    }

    #[test]
    fn edit_payload_resolves_nested_event_shape() {
        let payload = json!({
            "event": {
                "id": 42,
                "startStr": "2024-03-10",
                "endStr": "2024-03-13",
                "allDay": true
            }
        });
        let input = UpdateDatesInput::from_payload(&payload).expect("resolve");
        assert_eq!(input.id, Some(TaskId::new("42")));
        assert_eq!(input.start.as_deref(), Some("2024-03-10"));
        assert_eq!(input.end.as_deref(), Some("2024-03-13"));
        assert_eq!(input.all_day, Some(true));
    }

    #[test]
    fn flat_fields_win_over_nested_ones() {
        let payload = json!({
            "id": "flat",
            "event": { "id": "nested" },
            "isAllDay": false,
            "allDay": true
        });
        let input = UpdateDatesInput::from_payload(&payload).expect("resolve");
        assert_eq!(input.id, Some(TaskId::new("flat")));
        assert_eq!(input.all_day, Some(true));
    }

    #[test]
    fn all_day_edit_subtracts_one_day_from_end() {
        let storage = from_edit_payload(&json!({
            "id": "T1",
            "start": "2024-03-10T00:00:00Z",
            "end": "2024-03-13T00:00:00Z",
            "allDay": true
        }))
        .expect("convert");

        assert_eq!(storage.start_date, date(2024, 3, 10));
        assert_eq!(storage.end_date, Some(date(2024, 3, 12)));
        assert!(storage.all_day);
    }

    #[test]
    fn all_day_edit_without_end_is_single_day() {
        let storage = from_edit_payload(&json!({
            "id": "T1",
            "start": "2024-03-10",
            "allDay": "true"
        }))
        .expect("convert");
        assert_eq!(storage.end_date, Some(date(2024, 3, 10)));
    }

    #[test]
    fn missing_all_day_defaults_to_timed_pass_through() {
        let storage = from_edit_payload(&json!({
            "id": "T1",
            "start": "2024-03-10T09:00:00Z",
            "end": "2024-03-13T00:00:00Z"
        }))
        .expect("convert");

        assert!(!storage.all_day);
        assert_eq!(storage.start_date, date(2024, 3, 10));
        assert_eq!(storage.end_date, Some(date(2024, 3, 13)));
    }

    #[test]
    fn timed_edit_without_end_leaves_end_untouched() {
        let storage = from_edit_payload(&json!({ "id": "T1", "start": "2024-03-10T09:00:00Z" }))
            .expect("convert");
        assert_eq!(storage.end_date, None);
    }

    #[test]
    fn missing_id_or_start_is_a_validation_error() {
        let err = from_edit_payload(&json!({ "start": "2024-03-10" })).expect_err("no id");
        assert!(matches!(
            err,
            CoreError::Validation(TaskValidationError::MissingField("id"))
        ));

        let err = from_edit_payload(&json!({ "id": "T1", "start": "  " })).expect_err("no start");
        assert!(matches!(
            err,
            CoreError::Validation(TaskValidationError::MissingField("start"))
        ));
    }

    #[test]
    fn unparseable_dates_are_invalid_date_errors() {
        let err = from_edit_payload(&json!({ "id": "T1", "start": "Invalid Date" }))
            .expect_err("bad start");
        assert!(matches!(err, CoreError::InvalidDate(_)));

        let err = from_edit_payload(&json!({
            "id": "T1",
            "start": "2024-03-10",
            "end": "13/03/2024",
            "allDay": true
        }))
        .expect_err("bad end");
        assert!(matches!(err, CoreError::InvalidDate(_)));
    }

    #[test]
    fn zero_length_all_day_range_is_rejected() {
        let input = UpdateDatesInput {
            id: Some(TaskId::new("T1")),
            start: Some("2024-03-10".to_string()),
            end: Some("2024-03-10".to_string()),
            all_day: Some(true),
        };
        let err = to_storage_dates(&input).expect_err("inverted range");
        assert!(matches!(
            err,
            CoreError::Validation(TaskValidationError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn malformed_all_day_flag_is_rejected() {
        let err = UpdateDatesInput::from_payload(&json!({ "allDay": "sometimes" }))
            .expect_err("bad flag");
        assert!(matches!(
            err,
            TaskValidationError::InvalidField { field: "allDay", .. }
        ));
        let input = UpdateDatesInput::from_payload(&json!({ "allDay": 1 })).expect("numeric flag");
        assert_eq!(input.all_day, Some(true));
    }

    #[test]
    fn create_payload_accepts_numeric_and_text_project_ids() {
        let input = CreateTaskInput::from_payload(&json!({
            "title": "X",
            "startDate": "2024-05-01",
            "projectId": 7
        }))
        .expect("resolve");
        assert_eq!(input.project_id, Some(7));
        assert_eq!(input.end_date, None);

        let input = CreateTaskInput::from_payload(&json!({ "name": "Y", "project_id": "12" }))
            .expect("resolve");
        assert_eq!(input.title.as_deref(), Some("Y"));
        assert_eq!(input.project_id, Some(12));

        let err = CreateTaskInput::from_payload(&json!({ "projectId": "seven" }))
            .expect_err("non-numeric project");
        assert!(matches!(
            err,
            TaskValidationError::InvalidField { field: "projectId", .. }
        ));
    }
}
