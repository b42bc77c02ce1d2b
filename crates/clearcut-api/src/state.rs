//! Application state shared across handlers.

use crate::services::lifecycle::ArtifactLifecycle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<ArtifactLifecycle>,
}
