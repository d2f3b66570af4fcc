//! HTTP routing onto the request boundary.
//!
//! Routes accept any method; method rules live in `scheduler_api` so that
//! `405` bodies and `Allow` headers come from one place.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use log::error;
use rusqlite::Connection;
use scheduler_api::ApiResponse;
use std::sync::{Arc, Mutex};
use tokio::task;

/// Shared handle to the single SQLite connection.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one boundary call on the blocking pool while holding the
    /// connection.
    async fn run<F>(&self, call: F) -> Response
    where
        F: FnOnce(&Connection) -> ApiResponse + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let joined = task::spawn_blocking(move || match conn.lock() {
            Ok(conn) => call(&conn),
            Err(_) => {
                error!("event=db_lock module=server status=error error_code=lock_poisoned");
                ApiResponse::internal_error()
            }
        })
        .await;

        let response = joined.unwrap_or_else(|err| {
            error!("event=db_call module=server status=error error_code=join_failed error={err}");
            ApiResponse::internal_error()
        });
        into_http(response)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/events", any(events_handler))
        .route("/api/task/update", any(task_update_handler))
        .route("/api/task/create", any(task_create_handler))
        .route("/api/projects", any(projects_handler))
        .with_state(state)
}

async fn health_handler() -> Response {
    into_http(scheduler_api::health())
}

async fn events_handler(State(state): State<AppState>, method: Method) -> Response {
    state
        .run(move |conn| scheduler_api::events(conn, method.as_str()))
        .await
}

async fn task_update_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    state
        .run(move |conn| scheduler_api::task_update(conn, method.as_str(), &body))
        .await
}

async fn task_create_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    state
        .run(move |conn| scheduler_api::task_create(conn, method.as_str(), &body))
        .await
}

async fn projects_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    state
        .run(move |conn| scheduler_api::projects(conn, method.as_str(), &body))
        .await
}

fn into_http(api_response: ApiResponse) -> Response {
    let status =
        StatusCode::from_u16(api_response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(api_response.body)).into_response();
    if let Some(allow) = api_response.allow {
        if let Ok(value) = HeaderValue::from_str(&allow.join(", ")) {
            response.headers_mut().insert(header::ALLOW, value);
        }
    }
    response
}
