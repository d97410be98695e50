//! Authentication middleware for labelq-server
//!
//! Resolves the bearer credential in the `Authorization` header to a user
//! identity through the session store. Returns 401 before any handler runs
//! when the credential is missing, unknown, or expired, so unauthenticated
//! requests never touch the interaction tables.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::db::sessions;
use crate::AppState;

/// Verified principal derived from a request's bearer credential
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
}

/// Authentication middleware
///
/// Applied to protected routes only; the health endpoint skips it. On
/// success the resolved [`Identity`] is attached to request extensions for
/// handlers to consume.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers()).ok_or(AuthError::MissingCredential)?;

    let user_id = sessions::resolve_identity(&state.db, token)
        .await
        .map_err(|e| AuthError::SessionLookup(e.to_string()))?
        .ok_or_else(|| {
            warn!("Rejected request with unknown or expired credential");
            AuthError::NoActiveSession
        })?;

    request.extensions_mut().insert(Identity { user_id });

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingCredential,
    NoActiveSession,
    SessionLookup(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredential => (
                StatusCode::UNAUTHORIZED,
                "Missing bearer credential".to_string(),
            ),
            AuthError::NoActiveSession => (
                StatusCode::UNAUTHORIZED,
                "No active user session found.".to_string(),
            ),
            AuthError::SessionLookup(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Session lookup failed: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with_auth("Bearer abc-123");
        assert_eq!(bearer_token(&headers), Some("abc-123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_empty_value() {
        let headers = headers_with_auth("Bearer ");
        assert_eq!(bearer_token(&headers), None);
    }
}
