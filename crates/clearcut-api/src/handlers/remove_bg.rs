//! Background-removal upload handler.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use clearcut_core::constants::RETENTION_SECS;
use clearcut_core::{AppError, RemoveBgResponse};
use clearcut_processing::{UploadValidator, ValidationError};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// The multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

struct UploadedFile {
    original_name: String,
    content_type: String,
    data: Bytes,
}

/// Pull the image field out of the multipart body.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<UploadedFile>, HttpAppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;

        return Ok(Some(UploadedFile {
            original_name,
            content_type,
            data,
        }));
    }

    Ok(None)
}

/// Remove the background from an uploaded image.
///
/// Accepts a single JPEG/PNG/WebP file (max 10 MiB) in the `image` multipart
/// field, delegates processing to the external remover, and stores the PNG
/// result for twenty minutes under a fresh identifier.
#[utoipa::path(
    post,
    path = "/api/remove-bg",
    tag = "artifacts",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image processed", body = RemoveBgResponse),
        (status = 400, description = "No file, disallowed type, or oversized upload", body = ErrorResponse),
        (status = 500, description = "Background removal failed", body = ErrorResponse)
    )
)]
pub async fn remove_bg(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<RemoveBgResponse>, HttpAppError> {
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or(ValidationError::MissingFile)?;

    UploadValidator::default().validate(&upload.content_type, upload.data.len())?;

    tracing::debug!(
        original_name = %upload.original_name,
        content_type = %upload.content_type,
        size_bytes = upload.data.len(),
        "Processing upload"
    );

    let created = state
        .lifecycle
        .create(upload.data, &upload.content_type, &upload.original_name)
        .await?;

    let preview_base64 = format!("data:image/png;base64,{}", BASE64.encode(&created.payload));

    Ok(Json(RemoveBgResponse {
        success: true,
        id: created.id,
        download_url: format!("/api/download/{}", created.id),
        expires_in: RETENTION_SECS,
        expires_at: created.expires_at,
        preview_base64,
    }))
}
