//! CSV rendering of query results.

use crate::models::QueryResult;
use chrono::NaiveDate;

pub const CSV_HEADER: &str = "CUIT,Denominación,Situación,Fecha Consulta,Observaciones";

fn quoted(value: Option<&str>) -> String {
    format!("\"{}\"", value.unwrap_or("").replace('"', "\"\""))
}

/// Renders `results` as CSV, one row per result.
pub fn to_csv<'a, I>(results: I) -> String
where
    I: IntoIterator<Item = &'a QueryResult>,
{
    let mut lines = vec![CSV_HEADER.to_string()];

    for result in results {
        lines.push(
            [
                result.cuit.clone(),
                quoted(result.denomination.as_deref()),
                quoted(Some(result.status.label())),
                result.query_date.format("%Y-%m-%d").to_string(),
                quoted(result.observations.as_deref()),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// Keeps results whose CUIT contains `term`, or whose denomination or
/// status contains it ignoring case.
pub fn filter_results<'a>(results: &'a [QueryResult], term: &str) -> Vec<&'a QueryResult> {
    let needle = term.to_lowercase();
    results
        .iter()
        .filter(|r| {
            r.cuit.contains(term)
                || r
                    .denomination
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
                || r.status.label().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Download file name for an export produced on `date`.
pub fn file_name(date: NaiveDate) -> String {
    format!("consulta_bcra_{}.csv", date.format("%Y-%m-%d"))
}
