//! labelq-server - crowd-labeling HTTP service
//!
//! Hands authenticated users the next unlabeled dataset item and records
//! submitted labels against the user and item.

use anyhow::{Context, Result};
use labelq_common::config::ServerConfig;
use labelq_common::db::init_database;
use labelq_server::db::{items, sessions};
use labelq_server::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting labelq-server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!("Data directory: {}", config.data_dir.display());
    info!("Assignment lease: {} minutes", config.lease_minutes);

    let pool = init_database(&config.database_path())
        .await
        .context("Failed to initialize database")?;

    let item_count = items::count_items(&pool)
        .await
        .context("Failed to count dataset items")?;
    info!("{} dataset items loaded", item_count);

    // Sessions for disconnected users accumulate between runs
    let purged = sessions::purge_expired_sessions(&pool)
        .await
        .context("Failed to purge expired sessions")?;
    if purged > 0 {
        info!("Purged {} expired sessions", purged);
    }

    let state = AppState::new(pool, config.lease());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("labelq-server listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
