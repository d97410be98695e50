//! Labeling endpoint: finalize an in-progress interaction
//!
//! Transitions the caller's `started` interaction on the named item to
//! `completed` with the label attached, in a single conditional update.
//! A zero-row update is surfaced as 404 rather than silent success: the
//! client believed an assignment existed and needs to know it did not.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiError, Identity};
use crate::db::interactions;
use crate::AppState;

/// Request body for `POST /label_data`
#[derive(Debug, Deserialize)]
pub struct LabelDataRequest {
    pub dataset_id: String,
    pub label: String,
}

/// Response body for `POST /label_data`
#[derive(Debug, Serialize)]
pub struct LabelDataResponse {
    pub message: String,
}

/// POST /label_data
pub async fn label_data(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<LabelDataRequest>,
) -> Result<Json<LabelDataResponse>, ApiError> {
    if request.dataset_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "dataset_id must not be empty".to_string(),
        ));
    }
    if request.label.trim().is_empty() {
        return Err(ApiError::BadRequest("label must not be empty".to_string()));
    }

    let updated = interactions::complete_interaction(
        &state.db,
        &identity.user_id,
        &request.dataset_id,
        &request.label,
    )
    .await?;

    if !updated {
        return Err(ApiError::NotFound(format!(
            "No started interaction for item {}",
            request.dataset_id
        )));
    }

    info!(
        "User {} labeled item {} as {}",
        identity.user_id, request.dataset_id, request.label
    );

    Ok(Json(LabelDataResponse {
        message: "Entry added successfully!".to_string(),
    }))
}
