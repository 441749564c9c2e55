//! Handler results and their rendering into a final answer.

use serde_json::{Map, Value};

use crate::cell::{number_to_json, CellValue};
use crate::table::TOTAL_SALES_COLUMN;

/// Every non-product column of one matched row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub product: String,
    /// (column, value) in report column order.
    pub sales: Vec<(String, CellValue)>,
}

/// One entry of the top-products ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProduct {
    pub product: String,
    pub total_sales: f64,
}

/// One product's value for a single period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodValue {
    pub product: String,
    pub value: CellValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Products(Vec<ProductRecord>),
    Ranking(Vec<RankedProduct>),
    Period { period: String, values: Vec<PeriodValue> },
    Text(String),
}

/// What a handler produced.
///
/// `NotFound` is a normal answer, not a failure: its reason is shown to the
/// user verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NotFound(String),
    Found(Payload),
}

impl Outcome {
    pub fn not_found(reason: impl Into<String>) -> Self {
        Outcome::NotFound(reason.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Outcome::Found(Payload::Text(text.into()))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    /// Render the final answer text.
    ///
    /// Structured payloads become pretty-printed JSON with keys in a fixed
    /// order; `product_column` names the product key in row-shaped records.
    pub fn render(&self, product_column: &str) -> String {
        match self {
            Outcome::NotFound(reason) => reason.clone(),
            Outcome::Found(Payload::Text(text)) => text.clone(),
            Outcome::Found(payload) => {
                let value = payload_to_json(payload, product_column);
                // Serializing a Value we just built cannot fail
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

fn payload_to_json(payload: &Payload, product_column: &str) -> Value {
    match payload {
        Payload::Products(records) => Value::Array(
            records
                .iter()
                .map(|r| {
                    let sales: Map<String, Value> = r
                        .sales
                        .iter()
                        .map(|(col, v)| (col.clone(), v.to_json()))
                        .collect();
                    let mut obj = Map::new();
                    obj.insert("product".into(), Value::String(r.product.clone()));
                    obj.insert("sales".into(), Value::Object(sales));
                    Value::Object(obj)
                })
                .collect(),
        ),
        Payload::Ranking(ranking) => Value::Array(
            ranking
                .iter()
                .map(|r| {
                    let mut obj = Map::new();
                    obj.insert(product_column.to_string(), Value::String(r.product.clone()));
                    obj.insert(TOTAL_SALES_COLUMN.to_string(), number_to_json(r.total_sales));
                    Value::Object(obj)
                })
                .collect(),
        ),
        Payload::Period { period, values } => Value::Array(
            values
                .iter()
                .map(|v| {
                    let mut obj = Map::new();
                    obj.insert(product_column.to_string(), Value::String(v.product.clone()));
                    obj.insert(period.clone(), v.value.to_json());
                    Value::Object(obj)
                })
                .collect(),
        ),
        Payload::Text(text) => Value::String(text.clone()),
    }
}
