//! labelq-server library - crowd-labeling HTTP service
//!
//! Serves authenticated users the next unlabeled dataset item and records
//! submitted labels. All cross-request state lives in the database; the
//! handlers themselves are stateless.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Assignment lease duration: a `started` interaction older than this
    /// becomes eligible for re-assignment to its user
    pub lease: chrono::Duration,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, lease: chrono::Duration) -> Self {
        Self { db, lease }
    }
}

/// Build application router
///
/// The two labeling endpoints require a bearer credential; the health
/// endpoint does not. CORS is permissive (all origins) and the layer
/// answers preflight requests.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::post;
    use tower_http::cors::CorsLayer;

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/get_next_datapoint", post(api::get_next_datapoint))
        .route("/label_data", post(api::label_data))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = api::health_routes();

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
