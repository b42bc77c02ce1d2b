//! Domain models shared between the storage, lifecycle, and API layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::DOWNLOAD_SUFFIX;

/// Persisted per-artifact metadata record.
///
/// Serialized as a small JSON document next to the payload file. Unknown
/// fields in persisted records are ignored on read; the record shape is
/// fixed and `expires_at` is written exactly once, at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMeta {
    /// Absolute expiry timestamp; never extended after creation.
    pub expires_at: DateTime<Utc>,
    /// Filename supplied by the uploader. Untrusted: only its base name is
    /// ever used, and only to derive the download filename.
    pub original_name: String,
}

impl ArtifactMeta {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Remaining lifetime in whole seconds at `now` (zero once expired).
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    /// Download filename derived from the uploader's original name.
    ///
    /// Directory components are stripped and the name is reduced to its base
    /// stem, so a crafted `original_name` can never escape into a path or
    /// break the Content-Disposition header.
    pub fn download_filename(&self) -> String {
        let stem = Path::new(&self.original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| {
                s.chars()
                    .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
                    .collect::<String>()
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "image".to_string());
        format!("{}{}", stem, DOWNLOAD_SUFFIX)
    }
}

/// Result of a successful create: identity, expiry, and the processed payload
/// (returned so the HTTP layer can embed an inline preview).
#[derive(Debug, Clone)]
pub struct CreatedArtifact {
    pub id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub payload: Vec<u8>,
}

/// Response body for a successful background-removal request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBgResponse {
    pub success: bool,
    pub id: Uuid,
    pub download_url: String,
    /// Seconds until the artifact expires (fixed retention window).
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    /// `data:image/png;base64,...` URI of the processed image.
    pub preview_base64: String,
}

/// Response body for artifact status queries. Always returned with HTTP 200.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StatusResponse {
    pub fn missing() -> Self {
        StatusResponse {
            exists: false,
            expired: None,
            expires_in: None,
            expires_at: None,
        }
    }

    pub fn expired() -> Self {
        StatusResponse {
            exists: false,
            expired: Some(true),
            expires_in: None,
            expires_at: None,
        }
    }

    pub fn valid(expires_in: i64, expires_at: DateTime<Utc>) -> Self {
        StatusResponse {
            exists: true,
            expired: None,
            expires_in: Some(expires_in),
            expires_at: Some(expires_at),
        }
    }
}
