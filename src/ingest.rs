//! Extraction of CUITs from pasted text or uploaded CSV content.
//!
//! Produces the list the batch endpoint expects: cleaned, checksum-valid,
//! without duplicates. Rejected lines are reported with their 1-based line
//! number.

use crate::cuit::Cuit;
use crate::models::InputFormat;
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RejectedLine {
    pub line: usize,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct IngestReport {
    #[schema(value_type = Vec<String>)]
    pub cuits: Vec<Cuit>,
    pub rejected: Vec<RejectedLine>,
    /// Valid CUITs dropped because they appeared earlier in the input.
    pub duplicates: usize,
}

impl IngestReport {
    fn push_candidate(&mut self, seen: &mut HashSet<Cuit>, line: usize, candidate: &str) {
        match Cuit::parse(candidate) {
            Ok(cuit) => {
                if seen.insert(cuit.clone()) {
                    self.cuits.push(cuit);
                } else {
                    self.duplicates += 1;
                }
            }
            Err(e) => {
                tracing::warn!("Invalid CUIT on line {}: {}", line, candidate);
                self.rejected.push(RejectedLine {
                    line,
                    value: candidate.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Cleaned CUIT strings, ready for a batch request.
    pub fn cuit_strings(&self) -> Vec<String> {
        self.cuits.iter().map(|c| c.to_string()).collect()
    }
}

/// One candidate per non-blank line.
pub fn extract_from_text(text: &str) -> IngestReport {
    let mut report = IngestReport::default();
    let mut seen = HashSet::new();

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        report.push_candidate(&mut seen, index + 1, trimmed);
    }

    report
}

/// Candidate taken from the first column of each row; a `CUIT` header cell
/// is skipped.
pub fn extract_from_csv(text: &str) -> IngestReport {
    let mut report = IngestReport::default();
    let mut seen = HashSet::new();

    for (index, line) in text.lines().enumerate() {
        let first = line.split(',').next().unwrap_or("");
        let cell = first.trim().trim_matches('"').trim();
        if cell.is_empty() || cell.eq_ignore_ascii_case("cuit") {
            continue;
        }
        report.push_candidate(&mut seen, index + 1, cell);
    }

    report
}

pub fn extract(text: &str, format: InputFormat) -> IngestReport {
    match format {
        InputFormat::Lines => extract_from_text(text),
        InputFormat::Csv => extract_from_csv(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines() {
        let report = extract_from_text("20-34023207-1\n\n  20123456786  \nabc\n20340232071\n");

        assert_eq!(report.cuit_strings(), vec!["20340232071", "20123456786"]);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].line, 4);
        assert_eq!(report.rejected[0].value, "abc");
    }

    #[test]
    fn test_csv_first_column_and_header() {
        let csv = "CUIT,Nombre\n20340232071,Juan\r\n\"30500010912\",ACME\n20340232070,Mal\n";
        let report = extract_from_csv(csv);

        assert_eq!(report.cuit_strings(), vec!["20340232071", "30500010912"]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].line, 4);
        assert!(report.rejected[0].reason.contains("check digit"));
    }

    #[test]
    fn test_lowercase_header_skipped() {
        let report = extract_from_csv("cuit\n27987654320\n");
        assert_eq!(report.cuit_strings(), vec!["27987654320"]);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract("", InputFormat::Lines), IngestReport::default());
        assert_eq!(extract("\n\n", InputFormat::Csv), IngestReport::default());
    }
}
