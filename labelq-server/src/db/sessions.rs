//! Session store: bearer token to user identity
//!
//! Sessions are minted out-of-band (operator tooling, tests); the request
//! path only resolves them. There is no self-service signup surface.

use chrono::Utc;
use labelq_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Resolve a bearer token to a user id
///
/// Returns `Ok(None)` for unknown or expired tokens.
pub async fn resolve_identity(pool: &SqlitePool, token: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT user_id FROM sessions WHERE token = ? AND expires_at > ?",
    )
    .bind(token)
    .bind(Utc::now().to_rfc3339())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(user_id,)| user_id))
}

/// Mint a new session token for a user
pub async fn create_session(
    pool: &SqlitePool,
    user_id: &str,
    ttl: chrono::Duration,
) -> Result<String> {
    let token = Uuid::new_v4().to_string();
    let expires_at = (Utc::now() + ttl).to_rfc3339();

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(&expires_at)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Delete expired sessions
///
/// Returns the number of rows removed.
pub async fn purge_expired_sessions(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
