//! Domain model for scheduled tasks and their calendar projection.
//!
//! # Responsibility
//! - Define persisted entities (`Task`, `Project`, `Assignment`).
//! - Define the transient `CalendarEvent` view model rendered by the UI.
//!
//! # Invariants
//! - Persisted end dates are inclusive calendar days.
//! - `CalendarEvent` end boundaries are exclusive for all-day events.
//! - The two conventions never share one struct.

pub mod event;
pub mod project;
pub mod task;
