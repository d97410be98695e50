//! Dataset item queries
//!
//! Items are written by seeding/ingestion tooling only; the request path
//! treats this table as read-only.

use labelq_common::db::DatasetItem;
use labelq_common::Result;
use sqlx::SqlitePool;

/// Insert one dataset item (seeding/ingestion helper)
pub async fn insert_item(pool: &SqlitePool, id: &str, content: &str) -> Result<()> {
    sqlx::query("INSERT INTO dataset_items (id, content) VALUES (?, ?)")
        .bind(id)
        .bind(content)
        .execute(pool)
        .await?;
    Ok(())
}

/// Load one dataset item by id
pub async fn get_item(pool: &SqlitePool, id: &str) -> Result<Option<DatasetItem>> {
    let item = sqlx::query_as::<_, DatasetItem>(
        "SELECT id, content FROM dataset_items WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

/// Count all dataset items
pub async fn count_items(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dataset_items")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
