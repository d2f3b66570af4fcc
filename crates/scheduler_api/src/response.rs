//! Response envelope and error-to-status mapping.
//!
//! # Invariants
//! - Storage failures never leak their detail into the response body.
//! - `405` responses always carry the allowed method list.

use log::error;
use scheduler_core::CoreError;
use serde_json::{json, Value};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Status, optional `Allow` list and JSON body for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Set only for `405` responses.
    pub allow: Option<&'static [&'static str]>,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: STATUS_OK,
            allow: None,
            body,
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            allow: None,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(STATUS_BAD_REQUEST, message)
    }

    pub fn method_not_allowed(allow: &'static [&'static str]) -> Self {
        Self {
            status: STATUS_METHOD_NOT_ALLOWED,
            allow: Some(allow),
            body: json!({ "error": "Method Not Allowed" }),
        }
    }

    /// Generic failure with no internal detail.
    pub fn internal_error() -> Self {
        Self::error(STATUS_INTERNAL_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// Maps a core error onto the boundary status conventions.
    pub fn from_core_error(operation: &'static str, err: &CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => Self::bad_request(inner.to_string()),
            CoreError::InvalidDate(inner) => Self::bad_request(inner.to_string()),
            CoreError::NotFound(id) => Self::error(STATUS_NOT_FOUND, format!("Task not found: {id}")),
            CoreError::Storage(inner) => {
                error!(
                    "event={operation} module=api status=error error_code=storage_failure error={inner}"
                );
                Self::internal_error()
            }
        }
    }
}
