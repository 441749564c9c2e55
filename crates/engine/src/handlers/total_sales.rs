use tracing::debug;

use crate::context::QuestionContext;
use crate::outcome::Outcome;
use crate::table::{Row, Table};

pub const PRODUCT_NOT_FOUND: &str = "Product not found in the data.";
pub const NO_SALES_DATA: &str = "No sales data available for this product.";

/// Total sales for the first product named in the question.
///
/// Unlike the product-sales handler this stops at the first row (report
/// order) whose name occurs in the question.
pub fn handle(question: &QuestionContext, table: &Table) -> Outcome {
    let Some(row) = first_named(question, table) else {
        return Outcome::not_found(PRODUCT_NOT_FOUND);
    };

    if table.columns().is_empty() {
        return Outcome::not_found(NO_SALES_DATA);
    }

    let total = row.total();
    debug!(product = %row.product_name, total, "total sales");
    Outcome::text(format!("Total sales for {}: {:.2}", row.product_name, total))
}

/// First row, in report order, whose product name occurs in the question.
pub fn first_named<'t>(question: &QuestionContext, table: &'t Table) -> Option<&'t Row> {
    table.rows().iter().find(|row| row.is_named_in(question.lowered()))
}
