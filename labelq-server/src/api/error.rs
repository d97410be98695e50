//! API error responses
//!
//! Converts handler failures into structured `{"error": ...}` JSON bodies
//! with distinct status codes: 400 bad request, 404 not found, 500 for
//! datastore failures (underlying message kept, never swallowed).
//! Authentication failures are rejected earlier, by the middleware's own
//! error type (see `api::auth`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors surfaced by the labeling endpoints
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or empty request field
    BadRequest(String),
    /// No matching resource (e.g. no started interaction for the item)
    NotFound(String),
    /// Datastore or other internal failure
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Anything bubbling up from the shared layer is an internal failure by
/// the time it reaches a handler; expected conditions (no matching row,
/// blank fields) are mapped to their variants at the call site.
impl From<labelq_common::Error> for ApiError {
    fn from(err: labelq_common::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
