use thiserror::Error;

use crate::period::PeriodError;

/// Violation of the tabular shape invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row '{product}' has {found} value(s), expected {expected}")]
    Shape {
        product: String,
        expected: usize,
        found: usize,
    },
}

/// A header cell that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column {index}: {source}")]
pub struct HeaderError {
    /// Zero-based column position in the header row.
    pub index: usize,
    #[source]
    pub source: PeriodError,
}

/// The report could not be turned into a [`crate::table::Table`].
///
/// Load failures are fatal: nothing is classified or answered.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("report not found: {0}")]
    NotFound(String),
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
    #[error("unsupported report format '{0}' (expected xlsx, xls, ods, csv or tsv)")]
    Unsupported(String),
    #[error("cannot parse spreadsheet {path}: {message}")]
    Spreadsheet { path: String, message: String },
    #[error("cannot parse CSV {path}: {message}")]
    Csv { path: String, message: String },
    #[error("report {0} has no header row")]
    NoHeader(String),
    #[error("report has no '{0}' column")]
    MissingProductColumn(String),
    #[error("invalid header: {0}")]
    Header(#[from] HeaderError),
    #[error(transparent)]
    Shape(#[from] TableError),
}

/// The text-generation capability failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No generator is configured.
    #[error("text generation is disabled: {0}")]
    Disabled(String),
    #[error("text generator unreachable: {0}")]
    Unreachable(String),
    #[error("text generation timed out: {0}")]
    Timeout(String),
    #[error("text generator returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("malformed generator response: {0}")]
    Malformed(String),
}

/// Anything that stops an invocation from producing an answer.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
