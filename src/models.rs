use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use utoipa::ToSchema;

/// Text stored in `observations` when the registry has no record for a CUIT.
pub const NOT_FOUND_OBSERVATION: &str = "CUIT no encontrado en la Central de Deudores";

/// Text stored in `error` when the lookup itself failed.
pub const LOOKUP_FAILED: &str = "Error en la consulta";

// ============ Debtor situation ============

/// Debtor classification reported by the Central de Deudores.
///
/// Only the exact known labels map to a named variant. Anything else the
/// provider sends, including other spellings of a known label, is kept
/// verbatim in `Other` so it is reported as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Situation {
    Normal,
    SeguimientoEspecial,
    ConProblemas,
    Irrecuperable,
    SinDatos,
    Error,
    Other(String),
}

impl Situation {
    pub fn label(&self) -> &str {
        match self {
            Situation::Normal => "Normal",
            Situation::SeguimientoEspecial => "Seguimiento Especial",
            Situation::ConProblemas => "Con Problemas",
            Situation::Irrecuperable => "Irrecuperable",
            Situation::SinDatos => "Sin datos",
            Situation::Error => "Error",
            Situation::Other(label) => label,
        }
    }

    /// Parses a provider label.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Normal" => Situation::Normal,
            "Seguimiento Especial" => Situation::SeguimientoEspecial,
            "Con Problemas" => Situation::ConProblemas,
            "Irrecuperable" => Situation::Irrecuperable,
            "Sin datos" => Situation::SinDatos,
            "Error" => Situation::Error,
            _ => Situation::Other(label.to_string()),
        }
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Situation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Situation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Situation::from_label(&label))
    }
}

// ============ Query results ============

/// Normalized outcome of looking up one CUIT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// CUIT as submitted.
    pub cuit: String,
    /// Debtor display name, when the registry knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denomination: Option<String>,
    /// Debtor situation label.
    #[schema(value_type = String, example = "Normal")]
    pub status: Situation,
    /// Date the query ran (`YYYY-MM-DD`).
    #[schema(value_type = String, format = Date, example = "2024-05-17")]
    pub query_date: NaiveDate,
    /// Provider remark or failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    /// Set only when the query itself failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Result for a CUIT the registry answered 404 for.
    pub fn not_found(cuit: &str, query_date: NaiveDate) -> Self {
        Self {
            cuit: cuit.to_string(),
            denomination: None,
            status: Situation::SinDatos,
            query_date,
            observations: Some(NOT_FOUND_OBSERVATION.to_string()),
            error: None,
        }
    }

    /// Result substituted for a lookup that failed.
    pub fn failed(cuit: &str, query_date: NaiveDate, cause: &str) -> Self {
        Self {
            cuit: cuit.to_string(),
            denomination: None,
            status: Situation::Error,
            query_date,
            observations: Some(format!("Error: {}", cause)),
            error: Some(LOOKUP_FAILED.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ============ API payloads ============

/// POST /api/v1/consultas request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BatchRequest {
    /// CUITs to look up, in order.
    #[serde(default)]
    pub cuits: Vec<String>,
}

/// POST /api/v1/consultas response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchResponse {
    pub results: Vec<QueryResult>,
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Input format accepted by the CUIT parser endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// One CUIT per line.
    #[default]
    Lines,
    /// CUIT in the first column of each row.
    Csv,
}

/// POST /api/v1/cuits/parse request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ParseRequest {
    pub content: String,
    #[serde(default)]
    pub format: InputFormat,
}

/// POST /api/v1/consultas/export request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExportRequest {
    pub results: Vec<QueryResult>,
    /// Search term applied before exporting.
    #[serde(default)]
    pub filter: Option<String>,
}
