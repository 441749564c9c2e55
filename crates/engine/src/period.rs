//! Period keys: canonical `YYYY-MM` month identifiers.
//!
//! Report headers arrive in whatever shape the spreadsheet author used
//! (`2021-07-01`, `2021/07`, `Jul 2021`, a date cell). Everything that names a
//! month is folded into the canonical key so the router and handlers only ever
//! compare one format.

use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use thiserror::Error;

/// Why a header could not be turned into a period key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// The header does not look like a date at all.
    #[error("'{0}' is not a date header")]
    NotDateLike(String),
    /// The header is shaped like a date but names an impossible one.
    #[error("'{0}' is not a valid date")]
    Invalid(String),
}

fn period_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").unwrap())
}

fn numeric_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[-/](\d{1,2})(?:[-/](\d{1,2}))?(?:[ T]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$")
            .unwrap()
    })
}

fn month_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[ -](\d{4})$")
            .unwrap()
    })
}

/// True if `s` is already a canonical period key (`^\d{4}-\d{2}$`).
pub fn is_period_key(s: &str) -> bool {
    period_key_re().is_match(s)
}

/// True if `s` is shaped like a date and should go through [`normalize_period`].
pub fn looks_like_date(s: &str) -> bool {
    let trimmed = s.trim();
    numeric_date_re().is_match(trimmed) || month_name_re().is_match(trimmed)
}

/// Normalize a date-like header into a canonical `YYYY-MM` key.
pub fn normalize_period(raw: &str) -> Result<String, PeriodError> {
    let trimmed = raw.trim();

    if let Some(caps) = numeric_date_re().captures(trimmed) {
        let invalid = || PeriodError::Invalid(trimmed.to_string());
        let year: i32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        let day: u32 = match caps.get(3) {
            Some(d) => d.as_str().parse().map_err(|_| invalid())?,
            None => 1,
        };
        return NaiveDate::from_ymd_opt(year, month, day)
            .map(|d| d.format("%Y-%m").to_string())
            .ok_or_else(invalid);
    }

    if let Some(caps) = month_name_re().captures(trimmed) {
        let invalid = || PeriodError::Invalid(trimmed.to_string());
        let month = month_number(&caps[1]).ok_or_else(invalid)?;
        let year: i32 = caps[2].parse().map_err(|_| invalid())?;
        return NaiveDate::from_ymd_opt(year, month, 1)
            .map(|d| d.format("%Y-%m").to_string())
            .ok_or_else(invalid);
    }

    Err(PeriodError::NotDateLike(trimmed.to_string()))
}

/// 1..=12 for a three-letter month abbreviation, any case.
fn month_number(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let abbrev = abbrev.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|i| i as u32 + 1)
}

/// Convert a spreadsheet date serial (1900 date system) into a period key.
pub fn period_from_serial(serial: f64) -> Result<String, PeriodError> {
    if !serial.is_finite() || serial < 1.0 {
        return Err(PeriodError::Invalid(serial.to_string()));
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_days(Days::new(serial.floor() as u64)))
        .map(|d| d.format("%Y-%m").to_string())
        .ok_or_else(|| PeriodError::Invalid(serial.to_string()))
}

/// Human label for a period key, e.g. `2021-07` -> `Jul 2021`.
pub fn period_label(key: &str) -> Option<String> {
    if !is_period_key(key) {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%b %Y").to_string())
}
