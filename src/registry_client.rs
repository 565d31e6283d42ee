use crate::clock::Clock;
use crate::config::Config;
use crate::errors::{AppError, LookupError};
use crate::field_mapping;
use crate::models::{QueryResult, Situation};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// One lookup against the debtor registry.
///
/// Implementations must map a "no record" answer to a `Sin datos` result and
/// return `Err` only when the lookup itself failed.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup(&self, cuit: &str) -> Result<QueryResult, LookupError>;
}

/// Client for the BCRA Central de Deudores API.
#[derive(Clone)]
pub struct BcraClient {
    client: reqwest::Client,
    base_url: Url,
    clock: Arc<dyn Clock>,
}

impl BcraClient {
    /// Creates a new `BcraClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the base URL, user agent and request timeout.
    /// * `clock` - Date source for `queryDate`.
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.bcra_user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create BCRA client: {}", e))
            })?;

        let base_url = Url::parse(&config.bcra_base_url)
            .map_err(|e| AppError::InternalError(format!("Invalid BCRA base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::InternalError(format!(
                "BCRA base URL cannot carry a path: {}",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            clock,
        })
    }

    /// `{base}/Deudas/{cuit}`, with the CUIT percent-encoded as a single
    /// path segment.
    pub fn debts_url(&self, cuit: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("Deudas").push(cuit);
        }
        url
    }
}

#[async_trait]
impl RegistryLookup for BcraClient {
    async fn lookup(&self, cuit: &str) -> Result<QueryResult, LookupError> {
        let url = self.debts_url(cuit);
        tracing::debug!("Querying BCRA: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("BCRA status for {}: {}", cuit, status);

        if status == StatusCode::NOT_FOUND {
            tracing::info!("CUIT {} not found in Central de Deudores", cuit);
            return Ok(QueryResult::not_found(cuit, self.clock.today()));
        }

        if !status.is_success() {
            return Err(LookupError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| LookupError::InvalidBody(e.to_string()))?;
        tracing::debug!("BCRA data for {}: {}", cuit, data);

        Ok(normalize(cuit, &data, self.clock.as_ref()))
    }
}

/// Builds a result from a successful registry response body.
pub fn normalize(cuit: &str, data: &Value, clock: &dyn Clock) -> QueryResult {
    let fields = field_mapping::extract(data);

    QueryResult {
        cuit: cuit.to_string(),
        denomination: fields.denomination,
        status: fields
            .status
            .map(|s| Situation::from_label(&s))
            .unwrap_or(Situation::SinDatos),
        query_date: clock.today(),
        observations: fields.observations,
        error: None,
    }
}

// ============ Endpoint probe ============

/// CUIT used when probing candidate endpoints.
pub const PROBE_CUIT: &str = "20340232071";
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoint roots the registry has been published under.
pub const CANDIDATE_BASE_URLS: &[&str] = &[
    "https://api.bcra.gob.ar/centraldedeudores/v1.0",
    "https://api.bcra.gob.ar/central-deudores/v1.0",
    "https://api.bcra.gob.ar/centraldedeudores/v1",
    "https://api.bcra.gob.ar/centraldedeudores",
    "https://www.bcra.gob.ar/centraldedeudores/v1.0",
];

/// Outcome of probing one candidate URL.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of the registry diagnostics endpoint.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResponse {
    pub test_results: Vec<ProbeResult>,
}

/// Tries each base URL in turn against `PROBE_CUIT` and reports what came back.
pub async fn probe_endpoints(
    base_urls: &[String],
    user_agent: &str,
) -> Result<Vec<ProbeResult>, AppError> {
    let client = reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .user_agent(user_agent)
        .build()
        .map_err(|e| AppError::InternalError(format!("Failed to create probe client: {}", e)))?;

    let mut results = Vec::with_capacity(base_urls.len());
    for base in base_urls {
        let url = format!("{}/Deudas/{}", base.trim_end_matches('/'), PROBE_CUIT);
        tracing::info!("Probing registry URL: {}", url);
        results.push(probe_one(&client, url).await);
    }

    Ok(results)
}

async fn probe_one(client: &reqwest::Client, url: String) -> ProbeResult {
    let response = match client
        .get(&url)
        .header(ACCEPT, "application/json")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Probe of {} failed: {}", url, e);
            return ProbeResult {
                url,
                status: None,
                status_text: None,
                headers: None,
                success: false,
                data: None,
                parse_error: None,
                error: Some(e.to_string()),
            };
        }
    };

    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let mut result = ProbeResult {
        url,
        status: Some(status.as_u16()),
        status_text: Some(status.canonical_reason().unwrap_or("").to_string()),
        headers: Some(headers),
        success: status.is_success(),
        data: None,
        parse_error: None,
        error: None,
    };

    if status.is_success() {
        match response.json::<Value>().await {
            Ok(data) => result.data = Some(data),
            Err(_) => result.parse_error = Some("No es JSON válido".to_string()),
        }
    }

    result
}
