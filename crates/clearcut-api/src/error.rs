//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! convert into `HttpAppError` (a local newtype over `AppError`, needed for
//! the orphan rule) and render with a consistent JSON body, status code, and
//! level-aware log line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clearcut_core::{AppError, LogLevel};
use clearcut_processing::{ProcessingError, ValidationError};
use clearcut_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        // All validation failures, including oversized uploads, reject the
        // request as invalid input (400).
        HttpAppError(AppError::InvalidInput(err.to_string()))
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let ProcessingError::Failed(message) = err;
        HttpAppError(AppError::Processing(message))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::Storage(err.to_string()))
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            error: app_error.to_string(),
            code: app_error.error_code().to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_invalid_input() {
        let err = ValidationError::FileTooLarge {
            size: 15 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        let HttpAppError(app_err) = err.into();
        match app_err {
            AppError::InvalidInput(msg) => assert!(msg.contains("File too large")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        // Oversized uploads are a 400, not a 413
        assert_eq!(
            HttpAppError::from(ValidationError::EmptyFile)
                .0
                .http_status_code(),
            400
        );
    }

    #[test]
    fn test_processing_error_keeps_upstream_message() {
        let err = ProcessingError::Failed("model exploded".to_string());
        let HttpAppError(app_err) = err.into();
        match app_err {
            AppError::Processing(msg) => assert_eq!(msg, "model exploded"),
            other => panic!("Expected Processing, got {:?}", other),
        }
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "Not found: artifact".to_string(),
            code: "not_found".to_string(),
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json.get("code").and_then(|v| v.as_str()), Some("not_found"));
        assert!(json.get("error").and_then(|v| v.as_str()).is_some());
    }
}
