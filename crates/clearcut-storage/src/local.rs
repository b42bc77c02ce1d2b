//! Local filesystem storage backend.
//!
//! One flat directory shared by both stores: `{id}.png` for payloads,
//! `{id}.meta.json` for metadata records. State survives process restarts;
//! deletes are idempotent so concurrent sweeps race safely.

use crate::traits::{MetadataStore, PayloadStore, StorageError, StorageResult};
use async_trait::async_trait;
use clearcut_core::ArtifactMeta;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const META_SUFFIX: &str = ".meta.json";
const PAYLOAD_SUFFIX: &str = ".png";

async fn ensure_dir(base_path: &Path) -> StorageResult<()> {
    fs::create_dir_all(base_path).await.map_err(|e| {
        StorageError::BackendError(format!(
            "Failed to create storage directory {}: {}",
            base_path.display(),
            e
        ))
    })
}

async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
    let mut file = fs::File::create(path).await.map_err(|e| {
        StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
    })?;

    file.write_all(data).await.map_err(|e| {
        StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
    })?;

    Ok(())
}

/// Delete a file, treating absence as success.
async fn remove_file(path: &Path) -> StorageResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::DeleteFailed(format!(
            "Failed to delete file {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Filesystem-backed metadata store.
#[derive(Clone)]
pub struct LocalMetadataStore {
    base_path: PathBuf,
}

impl LocalMetadataStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        ensure_dir(&base_path).await?;
        Ok(LocalMetadataStore { base_path })
    }

    fn meta_path(&self, id: Uuid) -> PathBuf {
        self.base_path.join(format!("{}{}", id, META_SUFFIX))
    }
}

#[async_trait]
impl MetadataStore for LocalMetadataStore {
    async fn put(&self, id: Uuid, meta: &ArtifactMeta) -> StorageResult<()> {
        let path = self.meta_path(id);
        let data = serde_json::to_vec(meta)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to encode record: {}", e)))?;
        write_file(&path, &data).await?;

        tracing::debug!(id = %id, path = %path.display(), "Metadata record written");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<ArtifactMeta>> {
        let path = self.meta_path(id);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Metadata record unreadable, treating as absent");
                return Ok(None);
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Metadata record unparseable, treating as absent");
                Ok(None)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        remove_file(&self.meta_path(id)).await
    }

    async fn list_ids(&self) -> StorageResult<Vec<Uuid>> {
        let mut entries = fs::read_dir(&self.base_path).await.map_err(|e| {
            StorageError::ReadFailed(format!(
                "Failed to list storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ReadFailed(format!("Failed to read dir entry: {}", e)))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(stem) = name.strip_suffix(META_SUFFIX) else {
                continue;
            };
            // Foreign files in the directory are ignored
            if let Ok(id) = stem.parse::<Uuid>() {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

/// Filesystem-backed payload store.
#[derive(Clone)]
pub struct LocalPayloadStore {
    base_path: PathBuf,
}

impl LocalPayloadStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        ensure_dir(&base_path).await?;
        Ok(LocalPayloadStore { base_path })
    }

    fn payload_path(&self, id: Uuid) -> PathBuf {
        self.base_path.join(format!("{}{}", id, PAYLOAD_SUFFIX))
    }
}

#[async_trait]
impl PayloadStore for LocalPayloadStore {
    async fn put(&self, id: Uuid, data: &[u8]) -> StorageResult<()> {
        let path = self.payload_path(id);
        write_file(&path, data).await?;

        tracing::debug!(
            id = %id,
            path = %path.display(),
            size_bytes = data.len(),
            "Payload written"
        );
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<Vec<u8>>> {
        let path = self.payload_path(id);
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Payload unreadable, treating as absent");
                Ok(None)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        remove_file(&self.payload_path(id)).await
    }
}
