//! In-memory sales report.
//!
//! One row per product. The product column is held apart from the data
//! columns so handlers can iterate "everything except the product name"
//! without re-deriving it. A table is built once by a loader and only read
//! afterwards; handlers that need derived values compute them privately.

use crate::cell::CellValue;
use crate::error::TableError;
use crate::period::is_period_key;

/// Default name of the column holding product names.
pub const PRODUCT_COLUMN: &str = "Product Name";

/// Name of the derived per-row sum column.
pub const TOTAL_SALES_COLUMN: &str = "Total Sales";

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub product_name: String,
    /// Aligned with [`Table::columns`].
    pub values: Vec<CellValue>,
}

impl Row {
    /// Sum of every data column; non-numeric cells count as zero.
    pub fn total(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, v| acc + v.summand())
    }

    /// Whether this row's product name occurs in an already-lowercased question.
    ///
    /// An empty product name never matches.
    pub fn is_named_in(&self, lowered_question: &str) -> bool {
        let name = self.product_name.trim().to_lowercase();
        !name.is_empty() && lowered_question.contains(&name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    product_column: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(product_column: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            product_column: product_column.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must have exactly one value per data column.
    pub fn push_row(
        &mut self,
        product_name: impl Into<String>,
        values: Vec<CellValue>,
    ) -> Result<(), TableError> {
        let product_name = product_name.into();
        if values.len() != self.columns.len() {
            return Err(TableError::Shape {
                product: product_name,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(Row { product_name, values });
        Ok(())
    }

    pub fn product_column(&self) -> &str {
        &self.product_column
    }

    /// Data columns in report order, product column excluded.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Every column name in report order, product column first.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(self.product_column.as_str())
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    /// Data columns whose name is a canonical `YYYY-MM` period key.
    pub fn period_columns(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| is_period_key(c))
            .map(|(i, c)| (i, c.as_str()))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
