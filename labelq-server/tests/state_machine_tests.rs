//! Database-level tests for the interaction state machine
//!
//! Exercises claim/complete directly against an in-memory database,
//! including the lease expiry path that the HTTP tests cannot reach
//! without waiting out a real lease.

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use labelq_common::db::{create_schema, InteractionStatus};
use labelq_server::db::{interactions, items};

/// Lease used by every test in this file
fn lease() -> chrono::Duration {
    chrono::Duration::minutes(15)
}

/// Test helper: In-memory database with schema applied
async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");

    create_schema(&pool).await.expect("Should apply schema");
    pool
}

/// Test helper: Seed dataset items with deterministic ids
async fn seed_items(pool: &SqlitePool, ids: &[&str]) {
    for id in ids {
        items::insert_item(pool, id, &format!("content of {}", id))
            .await
            .expect("Should insert item");
    }
}

/// Test helper: Backdate an interaction's lease so it reads as abandoned
async fn backdate_assignment(pool: &SqlitePool, user_id: &str, item_id: &str, minutes_ago: i64) {
    let old = (Utc::now() - chrono::Duration::minutes(minutes_ago)).to_rfc3339();
    sqlx::query("UPDATE interactions SET assigned_at = ? WHERE user_id = ? AND item_id = ?")
        .bind(old)
        .bind(user_id)
        .bind(item_id)
        .execute(pool)
        .await
        .expect("Should backdate assignment");
}

// =============================================================================
// Claim Ordering and Eligibility
// =============================================================================

#[tokio::test]
async fn test_claim_takes_items_in_id_order() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P2", "P1", "P3"]).await;

    let item = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");

    assert_eq!(item.id, "P1");
}

#[tokio::test]
async fn test_claim_skips_completed_items() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1", "P2"]).await;

    let first = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    assert_eq!(first.id, "P1");

    let completed = interactions::complete_interaction(&pool, "U1", "P1", "TRUE")
        .await
        .expect("Should complete");
    assert!(completed);

    let second = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    assert_eq!(second.id, "P2");
}

#[tokio::test]
async fn test_unexpired_started_row_blocks_reselection() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1", "P2"]).await;

    let first = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    let second = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");

    assert_eq!(first.id, "P1");
    assert_eq!(second.id, "P2");
}

#[tokio::test]
async fn test_claim_returns_none_when_exhausted() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1"]).await;

    interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");

    // P1 is held under an unexpired lease; nothing else exists
    let next = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim");
    assert!(next.is_none());
}

#[tokio::test]
async fn test_claims_by_different_users_are_independent() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1"]).await;

    let for_u1 = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    let for_u2 = interactions::claim_next_item(&pool, "U2", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");

    assert_eq!(for_u1.id, "P1");
    assert_eq!(for_u2.id, "P1");
}

// =============================================================================
// Lease Expiry
// =============================================================================

#[tokio::test]
async fn test_expired_assignment_is_served_again_to_its_user() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1", "P2"]).await;

    interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");

    // Simulate abandonment: P1's lease ran out 20 minutes ago
    backdate_assignment(&pool, "U1", "P1", 20).await;

    let reclaimed = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    assert_eq!(reclaimed.id, "P1");

    // The lease was refreshed, so the next claim moves on to P2
    let next = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    assert_eq!(next.id, "P2");
}

#[tokio::test]
async fn test_expired_assignment_takes_priority_over_fresh_items() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1", "P2", "P3"]).await;

    interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    backdate_assignment(&pool, "U1", "P1", 60).await;

    // Abandoned P1 comes back before untouched P2/P3
    let item = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    assert_eq!(item.id, "P1");
}

#[tokio::test]
async fn test_no_duplicate_row_on_reclaim() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1"]).await;

    interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    backdate_assignment(&pool, "U1", "P1", 30).await;
    interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM interactions WHERE user_id = 'U1' AND item_id = 'P1'",
    )
    .fetch_one(&pool)
    .await
    .expect("Should count rows");
    assert_eq!(count, 1);
}

// =============================================================================
// Completion
// =============================================================================

#[tokio::test]
async fn test_complete_attaches_label_and_timestamp() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1"]).await;

    interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");

    let updated = interactions::complete_interaction(&pool, "U1", "P1", "FALSE")
        .await
        .expect("Should complete");
    assert!(updated);

    let interaction = interactions::get_interaction(&pool, "U1", "P1")
        .await
        .expect("Should load interaction")
        .expect("Interaction should exist");
    assert_eq!(interaction.status, InteractionStatus::Completed);
    assert_eq!(interaction.label.as_deref(), Some("FALSE"));
    assert!(interaction.completed_at.is_some());
}

#[tokio::test]
async fn test_complete_without_started_row_affects_nothing() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1"]).await;

    let updated = interactions::complete_interaction(&pool, "U1", "P1", "TRUE")
        .await
        .expect("Should run update");
    assert!(!updated);

    let interaction = interactions::get_interaction(&pool, "U1", "P1")
        .await
        .expect("Should load interaction");
    assert!(interaction.is_none());
}

#[tokio::test]
async fn test_complete_is_terminal() {
    let pool = setup_test_db().await;
    seed_items(&pool, &["P1"]).await;

    interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim")
        .expect("Item should be available");
    assert!(interactions::complete_interaction(&pool, "U1", "P1", "TRUE")
        .await
        .expect("Should complete"));

    // Second completion matches no started row
    assert!(!interactions::complete_interaction(&pool, "U1", "P1", "FALSE")
        .await
        .expect("Should run update"));

    // A completed item never comes back through claim, even backdated
    backdate_assignment(&pool, "U1", "P1", 120).await;
    let next = interactions::claim_next_item(&pool, "U1", lease())
        .await
        .expect("Should claim");
    assert!(next.is_none());
}
