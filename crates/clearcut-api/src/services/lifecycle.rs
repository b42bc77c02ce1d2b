//! Artifact lifecycle service: creation, lookup, and lazy reclamation.
//!
//! Keeps handler logic thin and allows unit testing without HTTP. There is no
//! background scheduler: every public operation starts with a best-effort
//! sweep that reclaims any record whose expiry has passed, so reclamation
//! latency is bounded by request arrival rather than a timer.
//!
//! All deletes are idempotent and all reads treat missing or partial state as
//! not-found, which keeps sweep/lookup races benign without locks.

use bytes::Bytes;
use chrono::{Duration, Utc};
use clearcut_core::constants::RETENTION_SECS;
use clearcut_core::{AppError, ArtifactMeta, CreatedArtifact, StatusResponse};
use clearcut_processing::{BackgroundRemover, ProcessingError};
use clearcut_storage::{MetadataStore, PayloadStore, StorageError};
use std::sync::Arc;
use uuid::Uuid;

fn processing_error(err: ProcessingError) -> AppError {
    let ProcessingError::Failed(message) = err;
    AppError::Processing(message)
}

fn storage_error(err: StorageError) -> AppError {
    AppError::Storage(err.to_string())
}

pub struct ArtifactLifecycle {
    metadata: Arc<dyn MetadataStore>,
    payloads: Arc<dyn PayloadStore>,
    remover: Arc<dyn BackgroundRemover>,
    retention: Duration,
}

impl ArtifactLifecycle {
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        payloads: Arc<dyn PayloadStore>,
        remover: Arc<dyn BackgroundRemover>,
    ) -> Self {
        Self::with_retention(metadata, payloads, remover, Duration::seconds(RETENTION_SECS))
    }

    /// Constructor with an explicit retention window, for tests.
    pub fn with_retention(
        metadata: Arc<dyn MetadataStore>,
        payloads: Arc<dyn PayloadStore>,
        remover: Arc<dyn BackgroundRemover>,
        retention: Duration,
    ) -> Self {
        Self {
            metadata,
            payloads,
            remover,
            retention,
        }
    }

    /// Process an upload and persist the result as a new artifact.
    ///
    /// The payload is written before the metadata record: a record without a
    /// payload would misreport availability, while a payload without a record
    /// is invisible. On processing failure nothing is persisted.
    pub async fn create(
        &self,
        data: Bytes,
        content_type: &str,
        original_name: &str,
    ) -> Result<CreatedArtifact, AppError> {
        self.sweep().await;

        let payload = self
            .remover
            .remove_background(data, content_type)
            .await
            .map_err(processing_error)?;

        let id = Uuid::new_v4();
        let expires_at = Utc::now() + self.retention;
        let meta = ArtifactMeta {
            expires_at,
            original_name: original_name.to_string(),
        };

        self.payloads
            .put(id, &payload)
            .await
            .map_err(storage_error)?;

        if let Err(e) = self.metadata.put(id, &meta).await {
            // Without a record the payload is unreachable; remove it again.
            if let Err(cleanup_err) = self.payloads.delete(id).await {
                tracing::warn!(
                    id = %id,
                    error = %cleanup_err,
                    "Failed to remove payload after metadata write error"
                );
            }
            return Err(storage_error(e));
        }

        tracing::info!(
            id = %id,
            expires_at = %expires_at,
            payload_bytes = payload.len(),
            "Artifact created"
        );

        Ok(CreatedArtifact {
            id,
            expires_at,
            payload,
        })
    }

    /// Look up a valid artifact and return its record and payload.
    ///
    /// The opening sweep leaves the requested id alone: its expiry must be
    /// observed by the direct lookup so the caller sees "expired" rather than
    /// a plain miss. The lookup itself reclaims it.
    pub async fn resolve(&self, id: Uuid) -> Result<(ArtifactMeta, Vec<u8>), AppError> {
        self.sweep_excluding(Some(id)).await;

        let meta = self
            .metadata
            .get(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| AppError::NotFound("Artifact not found".to_string()))?;

        if meta.is_expired(Utc::now()) {
            self.reclaim(id).await;
            return Err(AppError::Expired(
                "Artifact expired (retention window passed)".to_string(),
            ));
        }

        let payload = self
            .payloads
            .get(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| AppError::NotFound("Artifact payload missing".to_string()))?;

        Ok((meta, payload))
    }

    /// Existence and remaining lifetime for an identifier.
    ///
    /// Never fails: storage errors degrade to "does not exist". Detecting an
    /// expired record reclaims it as a side effect; as in `resolve`, the
    /// opening sweep skips the requested id so that detection still happens
    /// here.
    pub async fn status(&self, id: Uuid) -> StatusResponse {
        self.sweep_excluding(Some(id)).await;

        let meta = match self.metadata.get(id).await {
            Ok(Some(meta)) => meta,
            Ok(None) => return StatusResponse::missing(),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Status lookup failed, reporting absent");
                return StatusResponse::missing();
            }
        };

        let now = Utc::now();
        if meta.is_expired(now) {
            self.reclaim(id).await;
            return StatusResponse::expired();
        }

        StatusResponse::valid(meta.remaining_secs(now), meta.expires_at)
    }

    /// Reclaim every artifact whose expiry has passed.
    ///
    /// Best-effort: failures on individual records are logged and never abort
    /// the rest of the sweep or the enclosing request.
    pub async fn sweep(&self) {
        self.sweep_excluding(None).await;
    }

    /// Sweep everything except `keep`, which the caller is about to inspect
    /// itself and wants to find still on disk if it has expired.
    async fn sweep_excluding(&self, keep: Option<Uuid>) {
        let ids = match self.metadata.list_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Sweep could not list metadata records");
                return;
            }
        };

        let now = Utc::now();
        for id in ids {
            if Some(id) == keep {
                continue;
            }
            match self.metadata.get(id).await {
                Ok(Some(meta)) if meta.is_expired(now) => {
                    tracing::debug!(id = %id, expired_at = %meta.expires_at, "Sweeping expired artifact");
                    self.reclaim(id).await;
                }
                // Valid, already gone, or unreadable: leave it alone
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Sweep skipped unreadable record");
                }
            }
        }
    }

    /// Delete payload and metadata for an identifier. Idempotent; errors are
    /// logged and swallowed (a concurrent sweep may already have won).
    pub async fn reclaim(&self, id: Uuid) {
        if let Err(e) = self.payloads.delete(id).await {
            tracing::warn!(id = %id, error = %e, "Failed to delete artifact payload");
        }
        if let Err(e) = self.metadata.delete(id).await {
            tracing::warn!(id = %id, error = %e, "Failed to delete artifact metadata");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clearcut_storage::{MemoryMetadataStore, MemoryPayloadStore};

    struct StubRemover;

    #[async_trait]
    impl BackgroundRemover for StubRemover {
        async fn remove_background(
            &self,
            data: Bytes,
            _content_type: &str,
        ) -> Result<Vec<u8>, ProcessingError> {
            let mut out = b"\x89PNG".to_vec();
            out.extend_from_slice(&data);
            Ok(out)
        }
    }

    struct FailingRemover;

    #[async_trait]
    impl BackgroundRemover for FailingRemover {
        async fn remove_background(
            &self,
            _data: Bytes,
            _content_type: &str,
        ) -> Result<Vec<u8>, ProcessingError> {
            Err(ProcessingError::Failed("model unavailable".to_string()))
        }
    }

    struct Harness {
        metadata: Arc<MemoryMetadataStore>,
        payloads: Arc<MemoryPayloadStore>,
        lifecycle: ArtifactLifecycle,
    }

    fn harness_with(remover: Arc<dyn BackgroundRemover>) -> Harness {
        let metadata = Arc::new(MemoryMetadataStore::new());
        let payloads = Arc::new(MemoryPayloadStore::new());
        let lifecycle = ArtifactLifecycle::new(metadata.clone(), payloads.clone(), remover);
        Harness {
            metadata,
            payloads,
            lifecycle,
        }
    }

    fn harness() -> Harness {
        harness_with(Arc::new(StubRemover))
    }

    async fn seed_expired(h: &Harness, original_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let meta = ArtifactMeta {
            expires_at: Utc::now() - Duration::seconds(5),
            original_name: original_name.to_string(),
        };
        h.payloads.put(id, b"stale payload").await.unwrap();
        h.metadata.put(id, &meta).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_create_then_resolve_returns_payload() {
        let h = harness();
        let created = h
            .lifecycle
            .create(Bytes::from_static(b"jpeg data"), "image/jpeg", "cat.jpg")
            .await
            .unwrap();

        let (meta, payload) = h.lifecycle.resolve(created.id).await.unwrap();
        assert_eq!(payload, created.payload);
        assert_eq!(meta.original_name, "cat.jpg");
        assert_eq!(meta.expires_at, created.expires_at);
    }

    #[tokio::test]
    async fn test_create_sets_full_retention() {
        let h = harness();
        let created = h
            .lifecycle
            .create(Bytes::from_static(b"data"), "image/png", "a.png")
            .await
            .unwrap();

        let status = h.lifecycle.status(created.id).await;
        assert!(status.exists);
        let remaining = status.expires_in.unwrap();
        assert!((1195..=1200).contains(&remaining), "remaining={}", remaining);
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_is_not_found() {
        let h = harness();
        let err = h.lifecycle.resolve(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_status_unknown_id_reports_missing() {
        let h = harness();
        let status = h.lifecycle.status(Uuid::new_v4()).await;
        assert!(!status.exists);
        assert!(status.expired.is_none());
    }

    #[tokio::test]
    async fn test_processing_failure_persists_nothing() {
        let h = harness_with(Arc::new(FailingRemover));
        let err = h
            .lifecycle
            .create(Bytes::from_static(b"data"), "image/jpeg", "cat.jpg")
            .await
            .unwrap_err();

        match err {
            AppError::Processing(msg) => assert_eq!(msg, "model unavailable"),
            other => panic!("Expected Processing, got {:?}", other),
        }
        assert!(h.metadata.list_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_metadata_missing_payload_is_not_found() {
        let h = harness();
        let created = h
            .lifecycle
            .create(Bytes::from_static(b"data"), "image/jpeg", "cat.jpg")
            .await
            .unwrap();

        // Inconsistent state: payload vanished underneath the record
        h.payloads.delete(created.id).await.unwrap();

        let err = h.lifecycle.resolve(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_expired_reclaims_and_reports_expired() {
        let h = harness();
        let id = seed_expired(&h, "old.jpg").await;

        let err = h.lifecycle.resolve(id).await.unwrap_err();
        assert!(matches!(err, AppError::Expired(_)));

        assert!(h.metadata.get(id).await.unwrap().is_none());
        assert!(h.payloads.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_status_expired_reclaims_and_flags() {
        let h = harness();
        let id = seed_expired(&h, "old.jpg").await;

        let status = h.lifecycle.status(id).await;
        assert!(!status.exists);
        assert_eq!(status.expired, Some(true));

        // Subsequent status sees a plain miss, not "expired"
        let status = h.lifecycle.status(id).await;
        assert!(!status.exists);
        assert!(status.expired.is_none());
    }

    #[tokio::test]
    async fn test_sweep_runs_on_unrelated_operations() {
        let h = harness();
        let stale = seed_expired(&h, "stale.jpg").await;

        // Operation on a completely different id triggers the sweep
        let _ = h.lifecycle.status(Uuid::new_v4()).await;

        assert!(h.metadata.get(stale).await.unwrap().is_none());
        assert!(h.payloads.get(stale).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_leaves_valid_artifacts_alone() {
        let h = harness();
        let created = h
            .lifecycle
            .create(Bytes::from_static(b"data"), "image/jpeg", "keep.jpg")
            .await
            .unwrap();
        let stale = seed_expired(&h, "stale.jpg").await;

        h.lifecycle.sweep().await;

        assert!(h.metadata.get(created.id).await.unwrap().is_some());
        assert!(h.metadata.get(stale).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_target_still_reported_while_others_are_swept() {
        let h = harness();
        let target = seed_expired(&h, "target.jpg").await;
        let other = seed_expired(&h, "other.jpg").await;

        // The request's own sweep must not eat the looked-up record: expiry
        // has to be observable on the direct lookup.
        let status = h.lifecycle.status(target).await;
        assert_eq!(status.expired, Some(true));

        // Both records end up reclaimed regardless
        assert!(h.metadata.get(target).await.unwrap().is_none());
        assert!(h.metadata.get(other).await.unwrap().is_none());
        assert!(h.payloads.get(other).await.unwrap().is_none());

        let err = {
            let stale = seed_expired(&h, "again.jpg").await;
            h.lifecycle.resolve(stale).await.unwrap_err()
        };
        assert!(matches!(err, AppError::Expired(_)));
    }

    #[tokio::test]
    async fn test_reclaim_is_idempotent() {
        let h = harness();
        let id = seed_expired(&h, "gone.jpg").await;

        h.lifecycle.reclaim(id).await;
        // Second reclaim of an already-absent record is a no-op
        h.lifecycle.reclaim(id).await;

        assert!(h.metadata.get(id).await.unwrap().is_none());
        assert!(h.payloads.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fresh_identifiers_per_create() {
        let h = harness();
        let a = h
            .lifecycle
            .create(Bytes::from_static(b"one"), "image/jpeg", "a.jpg")
            .await
            .unwrap();
        let b = h
            .lifecycle
            .create(Bytes::from_static(b"two"), "image/jpeg", "b.jpg")
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
    }
}
