//! Service-wide constants.
//!
//! Retention and upload limits are deliberately constants rather than
//! configuration: artifacts always live for exactly twenty minutes and the
//! upload contract is fixed (JPEG/PNG/WebP in, PNG out).

/// How long a processed artifact stays downloadable after creation, in whole
/// seconds, as reported in create responses.
pub const RETENTION_SECS: i64 = 20 * 60;

/// Maximum accepted upload size in bytes (validated per file, returns 400).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Transport-level body cap. Kept well above `MAX_UPLOAD_BYTES` so oversized
/// uploads reach the validator and get a 400 instead of a transport 413.
pub const MAX_REQUEST_BYTES: usize = 32 * 1024 * 1024;

/// Content types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// The processed output is always PNG.
pub const OUTPUT_CONTENT_TYPE: &str = "image/png";

/// Suffix appended to the uploader's base name for the download filename.
pub const DOWNLOAD_SUFFIX: &str = "-no-bg.png";
