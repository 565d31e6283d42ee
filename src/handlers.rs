use crate::batch::BatchQueryService;
use crate::clock::Clock;
use crate::config::Config;
use crate::errors::{AppError, INVALID_BATCH_MESSAGE};
use crate::export;
use crate::ingest::{self, IngestReport};
use crate::models::*;
use crate::registry_client::{self, ProbeResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Sequential registry lookups.
    pub batch: BatchQueryService,
    /// Date source for export file names.
    pub clock: Arc<dyn Clock>,
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "bcra-deudores-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/consultas
///
/// Looks up every CUIT in the Central de Deudores, one at a time, and
/// returns one result per CUIT in request order. Failed lookups show up as
/// `Error` results; the request itself only fails when the body is not a
/// non-empty `cuits` array.
///
/// The batch runs on its own task so that a panic while processing it is
/// answered with a 500 instead of dropping the connection.
#[utoipa::path(
    post,
    path = "/api/v1/consultas",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "One result per CUIT", body = BatchResponse),
        (status = 400, description = "Missing or empty cuits array", body = ErrorResponse),
        (status = 500, description = "Unexpected internal fault", body = ErrorResponse)
    )
)]
pub async fn query_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Batch request rejected: {}", rejection.body_text());
        AppError::BadRequest(INVALID_BATCH_MESSAGE.to_string())
    })?;

    tracing::info!("POST /consultas - {} CUITs", request.cuits.len());

    let service = state.batch.clone();
    let results = tokio::spawn(async move { service.query(&request.cuits).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Batch task failed: {}", e)))??;

    tracing::info!("Query complete. {} results", results.len());
    Ok(Json(BatchResponse { results }))
}

/// POST /api/v1/cuits/parse
///
/// Extracts valid, de-duplicated CUITs from pasted text or CSV content.
#[utoipa::path(
    post,
    path = "/api/v1/cuits/parse",
    request_body = ParseRequest,
    responses(
        (status = 200, description = "Accepted and rejected candidates", body = IngestReport),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    )
)]
pub async fn parse_cuits(
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<IngestReport>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::BadRequest(format!("Invalid parse request: {}", rejection.body_text()))
    })?;

    let report = ingest::extract(&request.content, request.format);
    tracing::info!(
        "Parsed {:?} input: {} valid, {} rejected, {} duplicates",
        request.format,
        report.cuits.len(),
        report.rejected.len(),
        report.duplicates
    );

    Ok(Json(report))
}

/// POST /api/v1/consultas/export
///
/// Renders results as a CSV download.
#[utoipa::path(
    post,
    path = "/api/v1/consultas/export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "CSV file", body = String, content_type = "text/csv"),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    )
)]
pub async fn export_results(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::BadRequest(format!("Invalid export request: {}", rejection.body_text()))
    })?;

    let csv = match request.filter.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            export::to_csv(export::filter_results(&request.results, term))
        }
        _ => export::to_csv(&request.results),
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::file_name(state.clock.today())
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// GET /api/v1/diagnostics/registry
///
/// Probes the configured registry root and the known alternatives to find
/// which one answers and with what shape.
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics/registry",
    responses((status = 200, description = "Per-URL probe outcome", body = ProbeResponse))
)]
pub async fn probe_registry(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProbeResponse>, AppError> {
    let mut bases = vec![state.config.bcra_base_url.clone()];
    for candidate in registry_client::CANDIDATE_BASE_URLS {
        if !bases.iter().any(|b| b.as_str() == *candidate) {
            bases.push(candidate.to_string());
        }
    }

    let test_results =
        registry_client::probe_endpoints(&bases, &state.config.bcra_user_agent).await?;

    Ok(Json(ProbeResponse { test_results }))
}
