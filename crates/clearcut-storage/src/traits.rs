//! Storage abstraction traits
//!
//! All storage backends (local filesystem, in-memory) implement these traits.
//! The lifecycle manager works against them without coupling to the medium.

use async_trait::async_trait;
use clearcut_core::ArtifactMeta;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Store for per-artifact metadata records.
///
/// `get` never fails on malformed or unreadable persisted data: such records
/// are reported as absent. `delete` on an absent record is a no-op.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Durably persist the record, overwriting any prior record for this id.
    async fn put(&self, id: Uuid, meta: &ArtifactMeta) -> StorageResult<()>;

    /// Fetch the record. Missing, unreadable, or unparseable records all
    /// return `None`.
    async fn get(&self, id: Uuid) -> StorageResult<Option<ArtifactMeta>>;

    /// Remove the record. Absence is not an error.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// All identifiers with a (readable-looking) metadata record, for sweeps.
    async fn list_ids(&self) -> StorageResult<Vec<Uuid>>;
}

/// Store for artifact payload bytes. Payload format is fixed (PNG), so there
/// is no content negotiation at this layer.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Persist the payload under the identifier.
    async fn put(&self, id: Uuid, data: &[u8]) -> StorageResult<()>;

    /// Fetch the payload, or `None` if it is missing.
    async fn get(&self, id: Uuid) -> StorageResult<Option<Vec<u8>>>;

    /// Remove the payload. Absence is not an error.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;
}
