//! Store and service construction.

use crate::services::lifecycle::ArtifactLifecycle;
use crate::state::AppState;
use clearcut_core::Config;
use clearcut_processing::HttpBackgroundRemover;
use clearcut_storage::{LocalMetadataStore, LocalPayloadStore};
use std::sync::Arc;

/// Build the application state: local stores over the artifact directory and
/// the HTTP-backed background remover.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>, anyhow::Error> {
    let metadata = LocalMetadataStore::new(&config.storage_path).await?;
    let payloads = LocalPayloadStore::new(&config.storage_path).await?;
    let remover = HttpBackgroundRemover::new(config.remover_url.clone());

    tracing::info!(storage_path = %config.storage_path, "Artifact storage initialized");

    let lifecycle = ArtifactLifecycle::new(
        Arc::new(metadata),
        Arc::new(payloads),
        Arc::new(remover),
    );

    Ok(Arc::new(AppState {
        lifecycle: Arc::new(lifecycle),
    }))
}
