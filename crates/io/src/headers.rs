// Header row normalization
//
// Every loader reduces its first row to `RawHeader`s and hands them here, so
// xlsx and csv reports end up with identical column names:
//   - blank headers become "unnamed"
//   - date-like headers become canonical YYYY-MM period keys
//   - repeated names get a numeric suffix: Sales, Sales_1, Sales_2

use std::collections::HashSet;

use salesq_engine::period::{looks_like_date, normalize_period, period_from_serial};
use salesq_engine::HeaderError;
use tracing::warn;

/// Placeholder for a header cell with no text.
pub const UNNAMED: &str = "unnamed";

/// A header cell as read from the file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawHeader {
    Missing,
    Text(String),
    /// Spreadsheet date cell, as a 1900-system serial.
    DateSerial(f64),
}

/// Turn a header row into unique column names.
///
/// With `strict` set, a date-like header that cannot be normalized fails the
/// whole load; otherwise it keeps its original text.
pub fn normalize_headers(raw: &[RawHeader], strict: bool) -> Result<Vec<String>, HeaderError> {
    let mut names = Vec::with_capacity(raw.len());
    for (index, header) in raw.iter().enumerate() {
        names.push(normalize_one(index, header, strict)?);
    }
    Ok(dedupe(names))
}

fn normalize_one(index: usize, header: &RawHeader, strict: bool) -> Result<String, HeaderError> {
    match header {
        RawHeader::Missing => Ok(UNNAMED.to_string()),
        RawHeader::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(UNNAMED.to_string());
            }
            if !looks_like_date(trimmed) {
                return Ok(trimmed.to_string());
            }
            match normalize_period(trimmed) {
                Ok(period) => Ok(period),
                Err(source) if strict => Err(HeaderError { index, source }),
                Err(source) => {
                    warn!(column = index, error = %source, "keeping header as-is");
                    Ok(trimmed.to_string())
                }
            }
        }
        RawHeader::DateSerial(serial) => match period_from_serial(*serial) {
            Ok(period) => Ok(period),
            Err(source) if strict => Err(HeaderError { index, source }),
            Err(source) => {
                warn!(column = index, error = %source, "keeping date header as a number");
                Ok(serial.to_string())
            }
        },
    }
}

fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 0;
        while used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}_{}", name, suffix);
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesq_engine::period::PeriodError;

    fn text(s: &str) -> RawHeader {
        RawHeader::Text(s.to_string())
    }

    #[test]
    fn test_blank_headers_become_unnamed() {
        let names = normalize_headers(&[text("Product Name"), RawHeader::Missing, text("  ")], false).unwrap();
        assert_eq!(names, vec!["Product Name", "unnamed", "unnamed_1"]);
    }

    #[test]
    fn test_duplicates_get_numeric_suffix() {
        let names = normalize_headers(&[text("Sales"), text("Sales"), text("Sales")], false).unwrap();
        assert_eq!(names, vec!["Sales", "Sales_1", "Sales_2"]);
    }

    #[test]
    fn test_suffix_skips_names_already_taken() {
        let names = normalize_headers(&[text("A"), text("A_1"), text("A")], false).unwrap();
        assert_eq!(names, vec!["A", "A_1", "A_2"]);
    }

    #[test]
    fn test_date_headers_normalized() {
        let names = normalize_headers(
            &[
                text("Product Name"),
                text("2021-07-01 00:00:00"),
                text("Aug 2021"),
                RawHeader::DateSerial(44440.0),
            ],
            false,
        )
        .unwrap();
        assert_eq!(names, vec!["Product Name", "2021-07", "2021-08", "2021-09"]);
    }

    #[test]
    fn test_same_month_twice_is_deduplicated() {
        let names = normalize_headers(&[text("2021-07-01"), text("2021-07-15")], false).unwrap();
        assert_eq!(names, vec!["2021-07", "2021-07_1"]);
    }

    #[test]
    fn test_lenient_keeps_unparseable_date() {
        let names = normalize_headers(&[text("2021-13-01")], false).unwrap();
        assert_eq!(names, vec!["2021-13-01"]);
    }

    #[test]
    fn test_strict_rejects_unparseable_date() {
        let err = normalize_headers(&[text("Product Name"), text("2021-13-01")], true).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.source, PeriodError::Invalid("2021-13-01".to_string()));
    }

    #[test]
    fn test_strict_accepts_plain_text() {
        let names = normalize_headers(&[text("Product Name"), text("Region")], true).unwrap();
        assert_eq!(names, vec!["Product Name", "Region"]);
    }
}
