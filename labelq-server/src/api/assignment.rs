//! Assignment endpoint: hand out the next unlabeled item
//!
//! Claiming an item creates a `started` interaction as a side effect, so
//! back-to-back calls without an intervening label submission never return
//! the same item.

use axum::{extract::State, Extension, Json};
use labelq_common::db::DatasetItem;
use serde::Serialize;
use tracing::debug;

use crate::api::{ApiError, Identity};
use crate::db::interactions;
use crate::AppState;

/// Response body for `POST /get_next_datapoint`
///
/// The array carries zero or one items; empty means no eligible items
/// remain for this user (distinct from an error).
#[derive(Debug, Serialize)]
pub struct NextDatapointResponse {
    pub data: Vec<DatasetItem>,
}

/// POST /get_next_datapoint
pub async fn get_next_datapoint(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<NextDatapointResponse>, ApiError> {
    let item = interactions::claim_next_item(&state.db, &identity.user_id, state.lease).await?;

    match &item {
        Some(item) => debug!("Assigned item {} to user {}", item.id, identity.user_id),
        None => debug!("No eligible items remain for user {}", identity.user_id),
    }

    Ok(Json(NextDatapointResponse {
        data: item.into_iter().collect(),
    }))
}
