//! Upload validation.

use clearcut_core::constants::{ALLOWED_CONTENT_TYPES, MAX_UPLOAD_BYTES};

/// Validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("No file uploaded")]
    MissingFile,

    #[error("Empty file")]
    EmptyFile,
}

/// Upload validator
///
/// Checks size and declared content type against the fixed upload contract.
/// Defaults come from core constants; tests can construct tighter limits.
pub struct UploadValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(
            MAX_UPLOAD_BYTES,
            ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate all aspects of an uploaded file.
    pub fn validate(&self, content_type: &str, file_size: usize) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_content_type(content_type)?;
        Ok(())
    }
}
