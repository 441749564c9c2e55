use tracing::debug;

use crate::context::QuestionContext;
use crate::outcome::{Outcome, Payload, ProductRecord};
use crate::table::Table;

pub const NO_MATCH: &str = "No matching products found in the data.";

/// Sales breakdown for every product named in the question.
///
/// Matching is by substring, and every matching row is reported: a question
/// about `PC-1000-X` also matches a `PC-1000` row.
pub fn handle(question: &QuestionContext, table: &Table) -> Outcome {
    let records: Vec<ProductRecord> = table
        .rows()
        .iter()
        .filter(|row| row.is_named_in(question.lowered()))
        .map(|row| ProductRecord {
            product: row.product_name.clone(),
            sales: table
                .columns()
                .iter()
                .cloned()
                .zip(row.values.iter().cloned())
                .collect(),
        })
        .collect();

    debug!(matches = records.len(), "product sales lookup");

    if records.is_empty() {
        return Outcome::not_found(NO_MATCH);
    }
    Outcome::Found(Payload::Products(records))
}
