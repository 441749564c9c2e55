// Report loading: format dispatch and table assembly

use std::path::{Path, PathBuf};

use salesq_engine::{CellValue, LoadError, Table, TableLoader, PRODUCT_COLUMN};
use tracing::{debug, warn};

use crate::headers::{normalize_headers, RawHeader};

/// Sheet read from spreadsheet reports unless told otherwise.
pub const DEFAULT_SHEET: &str = "Sheet1";

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Worksheet to read. Falls back to the first sheet when absent.
    pub sheet: String,
    /// Header of the product-name column.
    pub product_column: String,
    /// Fail on date-like headers that cannot be normalized.
    pub strict_headers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: DEFAULT_SHEET.to_string(),
            product_column: PRODUCT_COLUMN.to_string(),
            strict_headers: false,
        }
    }
}

/// Load a report with default options.
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    load_table_with_options(path, &LoadOptions::default())
}

/// Load a report, choosing the reader from the file extension.
pub fn load_table_with_options(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => crate::xlsx::load(path, options)?,
        "csv" => crate::csv::load(path, options)?,
        "tsv" => crate::csv::load_tsv(path, options)?,
        other => return Err(LoadError::Unsupported(other.to_string())),
    };

    debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded report"
    );
    Ok(table)
}

/// A cell as read from the file, before numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawCell {
    /// Text exactly as stored (CSV fields, spreadsheet string cells).
    Text(String),
    /// A typed spreadsheet value.
    Value(CellValue),
}

impl RawCell {
    fn is_empty(&self) -> bool {
        match self {
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Value(v) => v.is_empty(),
        }
    }

    /// Data cells are coerced: numeric text becomes a number.
    fn into_value(self) -> CellValue {
        match self {
            RawCell::Text(s) => CellValue::from_input(&s),
            RawCell::Value(v) => v,
        }
    }

    /// Product names keep their text, so `00123` and `1e3` stay as written.
    fn into_product_name(self) -> String {
        match self {
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Value(v) => v.raw_display(),
        }
    }
}

/// Assemble a table from a header row and data rows.
///
/// Rows shorter than the header are padded with empty cells; extra trailing
/// cells are dropped. Rows with no content at all are skipped.
pub(crate) fn build_table(
    path: &Path,
    header: &[RawHeader],
    rows: Vec<Vec<RawCell>>,
    options: &LoadOptions,
) -> Result<Table, LoadError> {
    if header.is_empty() {
        return Err(LoadError::NoHeader(path.display().to_string()));
    }

    let names = normalize_headers(header, options.strict_headers)?;
    let product_idx = names
        .iter()
        .position(|n| n == &options.product_column)
        .ok_or_else(|| LoadError::MissingProductColumn(options.product_column.clone()))?;

    let columns: Vec<String> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != product_idx)
        .map(|(_, n)| n.clone())
        .collect();

    let mut table = Table::new(options.product_column.clone(), columns);
    let width = names.len();
    let mut truncated = 0usize;

    for mut cells in rows {
        if cells.iter().all(RawCell::is_empty) {
            continue;
        }
        if cells.len() > width {
            truncated += 1;
        }
        cells.resize(width, RawCell::Value(CellValue::Empty));

        let product = cells.remove(product_idx).into_product_name();
        let values = cells.into_iter().map(RawCell::into_value).collect();
        table.push_row(product, values)?;
    }

    if truncated > 0 {
        warn!(rows = truncated, "dropped cells beyond the header width");
    }

    Ok(table)
}

/// A report file on disk, re-read on every load.
#[derive(Debug, Clone)]
pub struct ReportSource {
    path: PathBuf,
    options: LoadOptions,
}

impl ReportSource {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }
}

impl TableLoader for ReportSource {
    fn load(&self) -> Result<Table, LoadError> {
        load_table_with_options(&self.path, &self.options)
    }
}
