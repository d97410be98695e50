//! Interaction state machine: claim and complete
//!
//! Per user-item pair:
//!
//! ```text
//! [no row] --(claim)--> started --(complete)--> completed
//! ```
//!
//! Both transitions are single conditional SQL statements. Together with
//! the (user_id, item_id) primary key and SQLite's serialized writers,
//! two concurrent claims can never hand the same item to the same user
//! twice, and a completed interaction can never be completed again.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use labelq_common::db::{DatasetItem, Interaction, InteractionStatus};
use labelq_common::{Error, Result};

use crate::db::items;

/// Claim the next eligible item for a user, creating (or refreshing) a
/// `started` interaction as a side effect
///
/// Eligibility, in priority order:
/// 1. An item this user already has in `started` status whose lease has
///    expired (an abandoned assignment, re-served with a fresh lease).
/// 2. The lowest-ordered item with no interaction row for this user.
///
/// Items the user has `completed` are never returned. An unexpired
/// `started` row blocks its item from re-selection, so back-to-back calls
/// return distinct items.
///
/// Returns `Ok(None)` when no eligible items remain.
pub async fn claim_next_item(
    pool: &SqlitePool,
    user_id: &str,
    lease: chrono::Duration,
) -> Result<Option<DatasetItem>> {
    let now = Utc::now();
    let now_str = now.to_rfc3339();
    let lease_cutoff = (now - lease).to_rfc3339();

    // Reclaim this user's oldest expired assignment first. The subquery
    // pins the row; refreshing assigned_at restarts the lease.
    let reclaimed: Option<(String,)> = sqlx::query_as(
        r#"
        UPDATE interactions
        SET assigned_at = ?
        WHERE user_id = ?
          AND status = 'started'
          AND item_id = (
              SELECT item_id FROM interactions
              WHERE user_id = ? AND status = 'started' AND assigned_at <= ?
              ORDER BY assigned_at
              LIMIT 1
          )
        RETURNING item_id
        "#,
    )
    .bind(&now_str)
    .bind(user_id)
    .bind(user_id)
    .bind(&lease_cutoff)
    .fetch_optional(pool)
    .await?;

    let item_id = match reclaimed {
        Some((item_id,)) => Some(item_id),
        None => {
            // Claim a fresh item: one conditional insert, no separate
            // select-then-insert step that could race.
            let claimed: Option<(String,)> = sqlx::query_as(
                r#"
                INSERT INTO interactions (user_id, item_id, status, assigned_at)
                SELECT ?, d.id, 'started', ?
                FROM dataset_items d
                WHERE NOT EXISTS (
                    SELECT 1 FROM interactions x
                    WHERE x.user_id = ? AND x.item_id = d.id
                )
                ORDER BY d.id
                LIMIT 1
                RETURNING item_id
                "#,
            )
            .bind(user_id)
            .bind(&now_str)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
            claimed.map(|(item_id,)| item_id)
        }
    };

    match item_id {
        Some(item_id) => {
            let item = items::get_item(pool, &item_id).await?.ok_or_else(|| {
                Error::Internal(format!("Claimed item {} has no content row", item_id))
            })?;
            Ok(Some(item))
        }
        None => Ok(None),
    }
}

/// Transition a `started` interaction to `completed`, attaching the label
///
/// The predicate is exact: user + item + prior status. Returns `false`
/// when no row matched (never started, already completed, or owned by
/// another user); the caller decides how to surface that.
pub async fn complete_interaction(
    pool: &SqlitePool,
    user_id: &str,
    item_id: &str,
    label: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE interactions
        SET status = 'completed', label = ?, completed_at = ?
        WHERE user_id = ? AND item_id = ? AND status = 'started'
        "#,
    )
    .bind(label)
    .bind(Utc::now().to_rfc3339())
    .bind(user_id)
    .bind(item_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load one interaction row (if any) for a user-item pair
pub async fn get_interaction(
    pool: &SqlitePool,
    user_id: &str,
    item_id: &str,
) -> Result<Option<Interaction>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, item_id, status, label, assigned_at, completed_at
        FROM interactions
        WHERE user_id = ? AND item_id = ?
        "#,
    )
    .bind(user_id)
    .bind(item_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let status_str: String = row.get("status");
            let status = InteractionStatus::parse(&status_str).ok_or_else(|| {
                Error::Internal(format!("Unknown interaction status: {}", status_str))
            })?;

            Ok(Some(Interaction {
                user_id: row.get("user_id"),
                item_id: row.get("item_id"),
                status,
                label: row.get("label"),
                assigned_at: row.get("assigned_at"),
                completed_at: row.get("completed_at"),
            }))
        }
        None => Ok(None),
    }
}
