//! Clearcut API
//!
//! HTTP surface for the background-removal service: a multipart create
//! endpoint, identifier-addressed download and status endpoints, and the
//! artifact lifecycle service they share. Exposed as a library so
//! integration tests can assemble the router without spawning the binary.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
