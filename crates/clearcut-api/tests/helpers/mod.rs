//! Test helpers: build the router over temp storage with a stub remover.
//!
//! Run with: `cargo test -p clearcut-api`.

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use clearcut_api::services::lifecycle::ArtifactLifecycle;
use clearcut_api::setup::routes::setup_routes;
use clearcut_api::state::AppState;
use clearcut_core::Config;
use clearcut_processing::{BackgroundRemover, ProcessingError};
use clearcut_storage::{LocalMetadataStore, LocalPayloadStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Deterministic stand-in for the external remover: prefixes the input with a
/// PNG signature so outputs are distinguishable and content-addressable in
/// assertions.
pub struct StubRemover;

#[async_trait]
impl BackgroundRemover for StubRemover {
    async fn remove_background(
        &self,
        data: Bytes,
        _content_type: &str,
    ) -> Result<Vec<u8>, ProcessingError> {
        let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
        out.extend_from_slice(&data);
        Ok(out)
    }
}

/// Remover that always fails with a fixed message.
pub struct FailingRemover;

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

/// Test application: server plus handles on the underlying stores so tests
/// can seed or inspect persisted state directly.
pub struct TestApp {
    pub server: TestServer,
    pub metadata: Arc<LocalMetadataStore>,
    pub payloads: Arc<LocalPayloadStore>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_remover(Arc::new(StubRemover)).await
}

pub async fn setup_test_app_with_remover(remover: Arc<dyn BackgroundRemover>) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let metadata = Arc::new(
        LocalMetadataStore::new(temp_dir.path())
            .await
            .expect("Failed to create metadata store"),
    );
    let payloads = Arc::new(
        LocalPayloadStore::new(temp_dir.path())
            .await
            .expect("Failed to create payload store"),
    );

    let lifecycle = ArtifactLifecycle::new(metadata.clone(), payloads.clone(), remover);

    let state = Arc::new(AppState {
        lifecycle: Arc::new(lifecycle),
    });

    let config = Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        storage_path: temp_dir.path().display().to_string(),
        remover_url: "http://unused.invalid/api/remove".to_string(),
    };

    let router = setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        metadata,
        payloads,
        _temp_dir: temp_dir,
    }
}

/// Minimal JPEG-ish fixture bytes. Content is never decoded by the service;
/// only the declared content type and size are validated.
pub fn jpeg_fixture() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend_from_slice(&[0u8; 2500]); // roughly a 50x50 image worth of bytes
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}
