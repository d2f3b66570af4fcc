//! Calendar-day normalization between UI and storage end-date conventions.
//!
//! # Responsibility
//! - Parse incoming date text into UTC instants.
//! - Convert between the calendar widget's exclusive all-day end and the
//!   storage inclusive end.
//!
//! # Invariants
//! - "Calendar day" always means the UTC calendar day. No path uses local time.
//! - For all-day ranges `inclusive_end == exclusive_end - 1 day`.
//! - Timed values pass through end conversion unchanged.
//! - Unparseable input is an error, never a sentinel value.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

pub type DateResult<T> = Result<T, InvalidDateError>;

/// Input text that does not resolve to a valid calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateError {
    input: String,
}

impl InvalidDateError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the rejected input as received.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Display for InvalidDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date: `{}`", self.input)
    }
}

impl Error for InvalidDateError {}

/// Parses date text into a UTC instant.
///
/// Accepted shapes, tried in order:
/// - RFC 3339 with `Z` or a numeric offset (converted to UTC).
/// - Naive date-time without offset (interpreted as UTC).
/// - Bare `YYYY-MM-DD` (midnight UTC).
///
/// # Errors
/// - Returns [`InvalidDateError`] for blank or unrecognized input.
pub fn parse_instant(input: &str) -> DateResult<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvalidDateError::new(input));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(day_start)
        .map_err(|_| InvalidDateError::new(input))
}

/// Returns midnight UTC of `date`.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Returns the UTC calendar day containing `instant`.
pub fn calendar_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Truncates `instant` to 00:00:00 UTC of the same calendar day.
pub fn snap_to_start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    day_start(calendar_day(instant))
}

/// Parses an exclusive end boundary and converts it to an inclusive one.
///
/// Returns `Ok(None)` when `input` is absent.
///
/// # Errors
/// - Returns [`InvalidDateError`] when `input` does not parse.
pub fn to_inclusive_end(input: Option<&str>, all_day: bool) -> DateResult<Option<DateTime<Utc>>> {
    let Some(raw) = input else {
        return Ok(None);
    };
    let parsed = parse_instant(raw)?;
    shift_to_inclusive(parsed, all_day).map(Some)
}

/// Instant-level form of [`to_inclusive_end`].
///
/// All-day: one calendar day earlier, snapped to midnight. Timed: unchanged.
pub fn shift_to_inclusive(exclusive_end: DateTime<Utc>, all_day: bool) -> DateResult<DateTime<Utc>> {
    if !all_day {
        return Ok(exclusive_end);
    }
    calendar_day(exclusive_end)
        .checked_sub_days(Days::new(1))
        .map(day_start)
        .ok_or_else(|| InvalidDateError::new(exclusive_end.to_rfc3339()))
}

/// Converts an inclusive end boundary to the exclusive one the widget expects.
///
/// All-day: one calendar day later, snapped to midnight. Timed: unchanged.
pub fn to_exclusive_end(inclusive_end: DateTime<Utc>, all_day: bool) -> DateResult<DateTime<Utc>> {
    if !all_day {
        return Ok(inclusive_end);
    }
    calendar_day(inclusive_end)
        .checked_add_days(Days::new(1))
        .map(day_start)
        .ok_or_else(|| InvalidDateError::new(inclusive_end.to_rfc3339()))
}
