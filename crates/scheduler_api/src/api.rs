//! Endpoint functions for the calendar UI.
//!
//! # Responsibility
//! - Enforce per-endpoint method rules.
//! - Decode request bodies and run exactly one core use case.
//!
//! # Invariants
//! - Entry points never panic; every failure becomes an [`ApiResponse`].
//! - An empty body is treated as `{}`.

use crate::response::ApiResponse;
use log::{debug, error, info};
use rusqlite::Connection;
use scheduler_core::{
    core_version, mapper, CoreError, CreateTaskInput, EventQueryService, ProjectService,
    SqliteProjectRepository, SqliteTaskRepository, TaskService,
};
use serde::Serialize;
use serde_json::{json, Value};

const EVENTS_METHODS: &[&str] = &["GET"];
const TASK_UPDATE_METHODS: &[&str] = &["PUT", "POST"];
const TASK_CREATE_METHODS: &[&str] = &["POST"];
const PROJECTS_METHODS: &[&str] = &["GET", "POST"];

/// Liveness probe with the core version.
pub fn health() -> ApiResponse {
    ApiResponse::ok(json!({ "status": "ok", "version": core_version() }))
}

/// `GET /api/events`: every task as a calendar event.
pub fn events(conn: &Connection, method: &str) -> ApiResponse {
    if let Some(rejected) = reject_method(method, EVENTS_METHODS) {
        return rejected;
    }

    let result = SqliteTaskRepository::try_new(conn)
        .map_err(CoreError::from)
        .and_then(|repo| EventQueryService::new(repo).list_events());
    match result {
        Ok(events) => json_body("events_list", &events),
        Err(err) => ApiResponse::from_core_error("events_list", &err),
    }
}

/// `PUT|POST /api/task/update`: applies a calendar drag/resize edit.
///
/// Success body: `{"ok": true, "id": "<task id>"}`.
pub fn task_update(conn: &Connection, method: &str, body: &[u8]) -> ApiResponse {
    if let Some(rejected) = reject_method(method, TASK_UPDATE_METHODS) {
        return rejected;
    }
    let payload = match parse_body(body) {
        Ok(payload) => payload,
        Err(rejected) => return rejected,
    };
    let edit = match mapper::from_edit_payload(&payload) {
        Ok(edit) => edit,
        Err(err) => return ApiResponse::from_core_error("task_update", &err),
    };
    debug!(
        "event=task_update module=api status=resolved has_end={} all_day={}",
        edit.end_date.is_some(),
        edit.all_day
    );

    let result = SqliteTaskRepository::try_new(conn)
        .map_err(CoreError::from)
        .and_then(|repo| TaskService::new(repo).apply_edit(&edit));
    match result {
        Ok(id) => ApiResponse::ok(json!({ "ok": true, "id": id })),
        Err(err) => ApiResponse::from_core_error("task_update", &err),
    }
}

/// `POST /api/task/create`: creates one all-day task.
///
/// Success body: `{"id": "<task id>"}`.
pub fn task_create(conn: &Connection, method: &str, body: &[u8]) -> ApiResponse {
    if let Some(rejected) = reject_method(method, TASK_CREATE_METHODS) {
        return rejected;
    }
    let payload = match parse_body(body) {
        Ok(payload) => payload,
        Err(rejected) => return rejected,
    };
    let input = match CreateTaskInput::from_payload(&payload) {
        Ok(input) => input,
        Err(err) => return ApiResponse::bad_request(err.to_string()),
    };

    let result = SqliteTaskRepository::try_new(conn)
        .map_err(CoreError::from)
        .and_then(|repo| TaskService::new(repo).create(&input));
    match result {
        Ok(id) => ApiResponse::ok(json!({ "id": id })),
        Err(err) => ApiResponse::from_core_error("task_create", &err),
    }
}

/// `GET /api/projects`: `{id, name}` pairs ordered by id.
///
/// `POST /api/projects` with `{"name": "..."}` adds a project and returns it.
pub fn projects(conn: &Connection, method: &str, body: &[u8]) -> ApiResponse {
    if let Some(rejected) = reject_method(method, PROJECTS_METHODS) {
        return rejected;
    }

    let service = match SqliteProjectRepository::try_new(conn) {
        Ok(repo) => ProjectService::new(repo),
        Err(err) => return ApiResponse::from_core_error("projects", &CoreError::from(err)),
    };

    if method == "GET" {
        return match service.list_projects() {
            Ok(projects) => json_body("projects_list", &projects),
            Err(err) => ApiResponse::from_core_error("projects_list", &err),
        };
    }

    let payload = match parse_body(body) {
        Ok(payload) => payload,
        Err(rejected) => return rejected,
    };
    let name = match payload.get("name") {
        None | Some(Value::Null) => "",
        Some(Value::String(name)) => name.as_str(),
        Some(_) => return ApiResponse::bad_request("invalid field name: expected a string"),
    };
    match service.create_project(name) {
        Ok(project) => {
            info!("event=project_create module=api status=ok project_id={}", project.id);
            json_body("project_create", &project)
        }
        Err(err) => ApiResponse::from_core_error("project_create", &err),
    }
}

fn reject_method(method: &str, allowed: &'static [&'static str]) -> Option<ApiResponse> {
    if allowed.contains(&method) {
        return None;
    }
    debug!("event=method_rejected module=api status=rejected method={method}");
    Some(ApiResponse::method_not_allowed(allowed))
}

fn parse_body(body: &[u8]) -> Result<Value, ApiResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ApiResponse::bad_request("Invalid JSON body"))?;
    if !value.is_object() {
        return Err(ApiResponse::bad_request("Request body must be a JSON object"));
    }
    Ok(value)
}

fn json_body<T: Serialize>(operation: &'static str, value: &T) -> ApiResponse {
    match serde_json::to_value(value) {
        Ok(body) => ApiResponse::ok(body),
        Err(err) => {
            error!("event={operation} module=api status=error error_code=serialize_failed error={err}");
            ApiResponse::internal_error()
        }
    }
}
