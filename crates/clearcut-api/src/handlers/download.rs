//! Artifact download handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use clearcut_core::constants::OUTPUT_CONTENT_TYPE;
use clearcut_core::AppError;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Download a processed artifact as a PNG attachment.
///
/// Expired artifacts answer 410 and are reclaimed by the same call.
#[utoipa::path(
    get,
    path = "/api/download/{id}",
    tag = "artifacts",
    params(
        ("id" = String, Path, description = "Artifact identifier")
    ),
    responses(
        (status = 200, description = "Processed PNG", content_type = "image/png"),
        (status = 404, description = "Unknown identifier or payload missing", body = ErrorResponse),
        (status = 410, description = "Artifact expired", body = ErrorResponse)
    )
)]
pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Identifiers are opaque UUIDs; anything else is an unknown artifact,
    // never a storage key.
    let id: Uuid = id
        .parse()
        .map_err(|_| AppError::NotFound("Artifact not found".to_string()))?;

    let (meta, payload) = state.lifecycle.resolve(id).await?;

    tracing::debug!(id = %id, size_bytes = payload.len(), "Serving artifact download");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, OUTPUT_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", meta.download_filename()),
        )
        .body(Body::from(payload))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
