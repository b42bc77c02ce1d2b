//! Background-removal adapter boundary.
//!
//! `BackgroundRemover` is an injected capability: raw image bytes plus the
//! declared content type in, PNG bytes out. Failures are opaque and
//! non-retryable from the caller's perspective. The production implementation
//! delegates to an external HTTP service; tests substitute deterministic
//! stubs.

use async_trait::async_trait;
use bytes::Bytes;

/// Processing failures. The message is surfaced verbatim to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Background removal failed: {0}")]
    Failed(String),
}

/// Capability that transforms an input image into a background-removed PNG.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Process `data` (declared as `content_type`) and return PNG bytes.
    async fn remove_background(
        &self,
        data: Bytes,
        content_type: &str,
    ) -> Result<Vec<u8>, ProcessingError>;
}

/// HTTP-backed remover: POSTs the raw bytes to an external removal service
/// and expects the processed PNG back in the response body.
///
/// No timeout or retry is applied at this layer; a hung upstream hangs the
/// request, and failures propagate as-is.
#[derive(Clone)]
pub struct HttpBackgroundRemover {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackgroundRemover {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl BackgroundRemover for HttpBackgroundRemover {
    async fn remove_background(
        &self,
        data: Bytes,
        content_type: &str,
    ) -> Result<Vec<u8>, ProcessingError> {
        let start = std::time::Instant::now();
        let input_size = data.len();

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::ACCEPT, "image/png")
            .body(data)
            .send()
            .await
            .map_err(|e| ProcessingError::Failed(format!("remover unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProcessingError::Failed(format!(
                "remover returned {}: {}",
                status,
                message.trim()
            )));
        }

        let output = response
            .bytes()
            .await
            .map_err(|e| ProcessingError::Failed(format!("failed to read remover response: {}", e)))?;

        tracing::info!(
            input_bytes = input_size,
            output_bytes = output.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Background removal completed"
        );

        Ok(output.to_vec())
    }
}
