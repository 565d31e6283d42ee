//! Declarative mapping from registry response keys to normalized fields.
//!
//! The registry's response shape is not documented reliably, so each
//! normalized field lists every key it has been seen under. The first key
//! holding a usable value wins. Supporting a new shape means adding a key
//! to this table.

use serde_json::Value;

/// Normalized fields filled from a registry response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedField {
    Denomination,
    Status,
    Observations,
}

/// One row of the mapping table.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub field: NormalizedField,
    /// Provider keys, in priority order.
    pub keys: &'static [&'static str],
}

pub const PROVIDER_FIELDS: &[FieldMapping] = &[
    FieldMapping {
        field: NormalizedField::Denomination,
        keys: &["denominacion", "razonSocial"],
    },
    FieldMapping {
        field: NormalizedField::Status,
        keys: &["situacion", "estado"],
    },
    FieldMapping {
        field: NormalizedField::Observations,
        keys: &["observaciones", "detalle"],
    },
];

/// Field values pulled out of a registry response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub denomination: Option<String>,
    pub status: Option<String>,
    pub observations: Option<String>,
}

impl ExtractedFields {
    fn set(&mut self, field: NormalizedField, value: String) {
        match field {
            NormalizedField::Denomination => self.denomination = Some(value),
            NormalizedField::Status => self.status = Some(value),
            NormalizedField::Observations => self.observations = Some(value),
        }
    }
}

/// Converts a JSON value to text, treating null, `false`, `0` and empty
/// strings as absent.
fn usable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Applies `mappings` to a response body. Bodies that are not JSON objects
/// yield no values.
pub fn extract_with(mappings: &[FieldMapping], body: &Value) -> ExtractedFields {
    let mut extracted = ExtractedFields::default();

    let Some(object) = body.as_object() else {
        return extracted;
    };

    for mapping in mappings {
        let found = mapping
            .keys
            .iter()
            .find_map(|key| object.get(*key).and_then(usable_text));

        if let Some(value) = found {
            extracted.set(mapping.field, value);
        }
    }

    extracted
}

/// Applies the registry mapping table.
pub fn extract(body: &Value) -> ExtractedFields {
    extract_with(PROVIDER_FIELDS, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_keys() {
        let fields = extract(&json!({
            "denominacion": "ACME SA",
            "situacion": "Normal",
            "observaciones": "Sin novedades"
        }));

        assert_eq!(fields.denomination.as_deref(), Some("ACME SA"));
        assert_eq!(fields.status.as_deref(), Some("Normal"));
        assert_eq!(fields.observations.as_deref(), Some("Sin novedades"));
    }

    #[test]
    fn test_alternate_keys() {
        let fields = extract(&json!({
            "razonSocial": "ACME SRL",
            "estado": "Con problemas",
            "detalle": "Mora de 90 días"
        }));

        assert_eq!(fields.denomination.as_deref(), Some("ACME SRL"));
        assert_eq!(fields.status.as_deref(), Some("Con problemas"));
        assert_eq!(fields.observations.as_deref(), Some("Mora de 90 días"));
    }

    #[test]
    fn test_primary_key_wins_over_alternate() {
        let fields = extract(&json!({ "situacion": "Normal", "estado": "Irrecuperable" }));
        assert_eq!(fields.status.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_empty_and_null_fall_through() {
        let fields = extract(&json!({
            "denominacion": "",
            "razonSocial": "Fallback SA",
            "situacion": null,
            "estado": "Normal"
        }));

        assert_eq!(fields.denomination.as_deref(), Some("Fallback SA"));
        assert_eq!(fields.status.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_numeric_values_rendered_as_text() {
        let fields = extract(&json!({ "situacion": 3, "estado": "Normal" }));
        assert_eq!(fields.status.as_deref(), Some("3"));

        let fields = extract(&json!({ "situacion": 0, "estado": "Normal" }));
        assert_eq!(fields.status.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_missing_fields_and_non_objects() {
        assert_eq!(extract(&json!({ "otro": 1 })), ExtractedFields::default());
        assert_eq!(extract(&json!([1, 2, 3])), ExtractedFields::default());
        assert_eq!(extract(&Value::Null), ExtractedFields::default());
    }

    #[test]
    fn test_custom_table() {
        let table = [FieldMapping {
            field: NormalizedField::Denomination,
            keys: &["nombre"],
        }];
        let fields = extract_with(&table, &json!({ "nombre": "Juan", "denominacion": "x" }));
        assert_eq!(fields.denomination.as_deref(), Some("Juan"));
        assert!(fields.status.is_none());
    }
}
