//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use clearcut_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clearcut API",
        version = "0.1.0",
        description = "Background-removal service. Uploads are processed by an external remover; results are downloadable by identifier for twenty minutes, then reclaimed lazily."
    ),
    paths(
        handlers::remove_bg::remove_bg,
        handlers::download::download_artifact,
        handlers::status::artifact_status,
        handlers::health::health,
    ),
    components(schemas(
        models::RemoveBgResponse,
        models::StatusResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "artifacts", description = "Background-removal artifacts"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;
