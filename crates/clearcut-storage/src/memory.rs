//! In-memory storage backend.
//!
//! Same contracts as the local backend, with a `HashMap` behind an async
//! lock as the medium. Used to test the lifecycle layer without touching
//! the filesystem; not durable across restarts.

use crate::traits::{MetadataStore, PayloadStore, StorageResult};
use async_trait::async_trait;
use clearcut_core::ArtifactMeta;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryMetadataStore {
    records: Arc<RwLock<HashMap<Uuid, ArtifactMeta>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn put(&self, id: Uuid, meta: &ArtifactMeta) -> StorageResult<()> {
        self.records.write().await.insert(id, meta.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<ArtifactMeta>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.records.write().await.remove(&id);
        Ok(())
    }

    async fn list_ids(&self) -> StorageResult<Vec<Uuid>> {
        Ok(self.records.read().await.keys().copied().collect())
    }
}

#[derive(Clone, Default)]
pub struct MemoryPayloadStore {
    blobs: Arc<RwLock<HashMap<Uuid, Vec<u8>>>>,
}

impl MemoryPayloadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PayloadStore for MemoryPayloadStore {
    async fn put(&self, id: Uuid, data: &[u8]) -> StorageResult<()> {
        self.blobs.write().await.insert(id, data.to_vec());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.blobs.write().await.remove(&id);
        Ok(())
    }
}
