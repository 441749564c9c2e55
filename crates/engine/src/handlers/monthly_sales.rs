use std::cmp::Ordering;

use tracing::debug;

use crate::cell::CellValue;
use crate::context::QuestionContext;
use crate::outcome::{Outcome, Payload, PeriodValue};
use crate::table::{Table, TOTAL_SALES_COLUMN};

pub const NO_MONTH: &str = "No specific month mentioned in the question.";

/// Every product's value for the month named in the question, best first.
///
/// The month is the first data column (report order) whose name appears
/// verbatim in the raw question; the match is case-sensitive.
pub fn handle(question: &QuestionContext, table: &Table) -> Outcome {
    let Some((index, month)) = find_month(question.raw(), table) else {
        return Outcome::not_found(NO_MONTH);
    };

    let mut values: Vec<PeriodValue> = table
        .rows()
        .iter()
        .map(|row| PeriodValue {
            product: row.product_name.clone(),
            value: row.values[index].clone(),
        })
        .collect();

    values.sort_by(|a, b| descending(&a.value, &b.value));

    debug!(month, rows = values.len(), "monthly sales");
    Outcome::Found(Payload::Period {
        period: month.to_string(),
        values,
    })
}

fn find_month<'t>(raw_question: &str, table: &'t Table) -> Option<(usize, &'t str)> {
    table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.as_str() != TOTAL_SALES_COLUMN && !c.is_empty())
        .find(|(_, c)| raw_question.contains(c.as_str()))
        .map(|(i, c)| (i, c.as_str()))
}

/// Numbers descending; non-numeric cells after every number.
fn descending(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
