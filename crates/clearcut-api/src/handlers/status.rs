//! Artifact status handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use clearcut_core::StatusResponse;
use uuid::Uuid;

use crate::state::AppState;

/// Report whether an artifact exists and how long it remains downloadable.
///
/// Always answers 200; expiry is reported as `exists: false, expired: true`
/// (and reclaims the record as a side effect).
#[utoipa::path(
    get,
    path = "/api/status/{id}",
    tag = "artifacts",
    params(
        ("id" = String, Path, description = "Artifact identifier")
    ),
    responses(
        (status = 200, description = "Artifact status", body = StatusResponse)
    )
)]
pub async fn artifact_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<StatusResponse> {
    let Ok(id) = id.parse::<Uuid>() else {
        return Json(StatusResponse::missing());
    };

    Json(state.lifecycle.status(id).await)
}
