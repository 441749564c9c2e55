//! Question routing.
//!
//! Keyword rules over the lowercased question pick one of a closed set of
//! intents. Rules are checked in a fixed order and the first hit wins, so a
//! question that mentions both "product sales" and "top products" is a
//! product-sales question.

use serde::Serialize;

use crate::period::is_period_key;

/// Which handler answers a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ProductSales,
    TopProducts,
    MonthlySales,
    GeneralQuery,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ProductSales => "product_sales",
            Intent::TopProducts => "top_products",
            Intent::MonthlySales => "monthly_sales",
            Intent::GeneralQuery => "general_query",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a question against the report's column names.
///
/// 1. "product" and ("sales" or "sell")       -> ProductSales
/// 2. "top" and ("product" or "selling")      -> TopProducts
/// 3. "month", or any `YYYY-MM` column named  -> MonthlySales
/// 4. otherwise                               -> GeneralQuery
pub fn classify<S: AsRef<str>>(question: &str, columns: &[S]) -> Intent {
    let q = question.to_lowercase();

    if q.contains("product") && (q.contains("sales") || q.contains("sell")) {
        Intent::ProductSales
    } else if q.contains("top") && (q.contains("product") || q.contains("selling")) {
        Intent::TopProducts
    } else if q.contains("month") || mentions_period_column(&q, columns) {
        Intent::MonthlySales
    } else {
        Intent::GeneralQuery
    }
}

fn mentions_period_column<S: AsRef<str>>(lowered: &str, columns: &[S]) -> bool {
    columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| is_period_key(c))
        .any(|c| lowered.contains(c))
}
