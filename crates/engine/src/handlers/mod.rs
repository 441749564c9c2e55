//! One query handler per intent, plus the reduced total-sales handler.
//!
//! Handlers never fail on missing or ambiguous input: anything that does not
//! match comes back as [`Outcome::NotFound`](crate::outcome::Outcome) with a
//! fixed message. Only the fallback responder can fail, when the text
//! generator does.

pub mod general;
pub mod monthly_sales;
pub mod product_sales;
pub mod top_products;
pub mod total_sales;
