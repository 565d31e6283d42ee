use crate::handlers;
use crate::ingest::{IngestReport, RejectedLine};
use crate::models::{
    BatchRequest, BatchResponse, ErrorResponse, ExportRequest, InputFormat, ParseRequest,
    QueryResult,
};
use crate::registry_client::{ProbeResponse, ProbeResult};
use axum::{http::StatusCode, response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BCRA Deudores API",
        description = "Batch lookups against the BCRA Central de Deudores"
    ),
    paths(
        handlers::health,
        handlers::query_batch,
        handlers::parse_cuits,
        handlers::export_results,
        handlers::probe_registry
    ),
    components(schemas(
        BatchRequest,
        BatchResponse,
        QueryResult,
        ErrorResponse,
        ParseRequest,
        InputFormat,
        IngestReport,
        RejectedLine,
        ExportRequest,
        ProbeResult,
        ProbeResponse
    ))
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serves the Swagger UI HTML page.
///
/// The page loads its assets from unpkg and points at `serve_openapi_spec`.
pub async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>BCRA Deudores API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}
