//! Request boundary for the scheduling UI.
//!
//! Framework-agnostic: every entry point takes the HTTP method, the raw body
//! and a migrated connection, and returns an [`ApiResponse`] envelope.

mod api;
mod response;

pub use api::{events, health, projects, task_create, task_update};
pub use response::ApiResponse;
