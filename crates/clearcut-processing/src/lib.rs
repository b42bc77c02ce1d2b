//! Clearcut Processing Library
//!
//! The background-removal adapter boundary and upload validation. The removal
//! algorithm itself is an external collaborator: this crate only defines the
//! capability interface and an HTTP-backed implementation of it.

pub mod remover;
pub mod validator;

pub use remover::{BackgroundRemover, HttpBackgroundRemover, ProcessingError};
pub use validator::{UploadValidator, ValidationError};
