use crate::docs;
use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// API endpoints, without state. Rate limiting is layered on by the caller.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/consultas", post(handlers::query_batch))
        // Path the web front end posts to
        .route("/api/consulta-bcra", post(handlers::query_batch))
        .route("/api/v1/consultas/export", post(handlers::export_results))
        .route("/api/v1/cuits/parse", post(handlers::parse_cuits))
        .route(
            "/api/v1/diagnostics/registry",
            get(handlers::probe_registry),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Full application: health check and docs, plus `api`.
pub fn app(state: Arc<AppState>, api: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/docs", get(docs::serve_swagger_ui))
        .route("/api-docs/openapi.json", get(docs::serve_openapi_spec))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
