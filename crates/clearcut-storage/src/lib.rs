//! Clearcut Storage Library
//!
//! Storage abstraction and backends for artifact payloads and their metadata
//! records. The two logical stores are deliberately separate traits so the
//! lifecycle layer can treat "payload bytes" and "metadata record" as
//! independent key-value concerns keyed by the same identifier.
//!
//! # Layout
//!
//! The local backend keeps one payload file and one metadata file per
//! identifier in a single flat directory:
//!
//! - payload: `{id}.png`
//! - metadata: `{id}.meta.json`
//!
//! Identifiers are typed as `Uuid` throughout, which makes path traversal
//! unrepresentable: keys never pass through the filesystem as raw strings.

pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use local::{LocalMetadataStore, LocalPayloadStore};
pub use memory::{MemoryMetadataStore, MemoryPayloadStore};
pub use traits::{MetadataStore, PayloadStore, StorageError, StorageResult};
