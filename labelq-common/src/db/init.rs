//! Database initialization
//!
//! Creates the SQLite database on first run and applies the schema
//! idempotently on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Bounded wait on writer lock contention
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent - safe to call multiple times)
///
/// Exposed separately so tests can apply the schema to in-memory pools.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_dataset_items_table(pool).await?;
    create_interactions_table(pool).await?;
    create_sessions_table(pool).await?;
    Ok(())
}

async fn create_dataset_items_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dataset_items (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_interactions_table(pool: &SqlitePool) -> Result<()> {
    // PRIMARY KEY (user_id, item_id) enforces at most one interaction row
    // per user-item pair, which subsumes "at most one started row".
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interactions (
            user_id TEXT NOT NULL,
            item_id TEXT NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('started', 'completed')),
            label TEXT,
            assigned_at TEXT NOT NULL,
            completed_at TEXT,
            PRIMARY KEY (user_id, item_id),
            FOREIGN KEY (item_id) REFERENCES dataset_items(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Claim queries scan for started rows by user and age
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_interactions_user_status
         ON interactions(user_id, status, assigned_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
