//! Question in, answer out.
//!
//! load table -> classify -> run handler -> render. Every call loads its own
//! table snapshot and keeps nothing afterwards, so a `Pipeline` can be reused
//! for any number of questions.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::context::QuestionContext;
use crate::error::{GenerationError, LoadError, PipelineError};
use crate::generate::TextGenerator;
use crate::handlers::{general, monthly_sales, product_sales, top_products, total_sales};
use crate::outcome::Outcome;
use crate::plot::{self, PlotOutcome};
use crate::router::{classify, Intent};
use crate::table::Table;

/// Source of the sales report.
pub trait TableLoader {
    fn load(&self) -> Result<Table, LoadError>;
}

impl<F> TableLoader for F
where
    F: Fn() -> Result<Table, LoadError>,
{
    fn load(&self) -> Result<Table, LoadError> {
        self()
    }
}

/// The final answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    /// Routed intent; `None` for the fixed-handler entry points.
    pub intent: Option<Intent>,
    /// False when the handler reported that nothing matched.
    pub found: bool,
    pub text: String,
}

impl Answer {
    fn from_outcome(intent: Option<Intent>, outcome: &Outcome, table: &Table) -> Self {
        Self {
            intent,
            found: outcome.is_found(),
            text: outcome.render(table.product_column()),
        }
    }
}

pub struct Pipeline<L, G> {
    loader: L,
    generator: G,
}

impl<L: TableLoader, G: TextGenerator> Pipeline<L, G> {
    pub fn new(loader: L, generator: G) -> Self {
        Self { loader, generator }
    }

    /// Route the question to a handler and render its outcome.
    pub fn answer(&self, question: &str) -> Result<Answer, PipelineError> {
        let table = self.load()?;
        let question = QuestionContext::new(question);
        let (intent, outcome) = dispatch(&question, &table, &self.generator)?;
        info!(intent = %intent, found = outcome.is_found(), "answered");
        Ok(Answer::from_outcome(Some(intent), &outcome, &table))
    }

    /// Total sales for the first product named in the question, no routing.
    pub fn answer_total(&self, question: &str) -> Result<Answer, PipelineError> {
        let table = self.load()?;
        let question = QuestionContext::new(question);
        let outcome = total_sales::handle(&question, &table);
        info!(found = outcome.is_found(), "answered total");
        Ok(Answer::from_outcome(None, &outcome, &table))
    }

    /// Monthly series for the first product named in the question.
    pub fn plot(&self, question: &str, output_dir: &Path) -> Result<PlotOutcome, PipelineError> {
        let table = self.load()?;
        let question = QuestionContext::new(question);
        Ok(plot::prepare(&question, &table, output_dir))
    }

    /// Load the report without answering anything.
    pub fn load(&self) -> Result<Table, PipelineError> {
        let table = self.loader.load()?;
        debug!(rows = table.len(), columns = table.columns().len(), "report loaded");
        Ok(table)
    }
}

/// Classify the question and run the matching handler.
///
/// Only the fallback responder can fail.
pub fn dispatch(
    question: &QuestionContext,
    table: &Table,
    generator: &dyn TextGenerator,
) -> Result<(Intent, Outcome), GenerationError> {
    let columns = table.column_names();
    let intent = classify(question.raw(), &columns);
    debug!(intent = %intent, "routed question");

    let outcome = match intent {
        Intent::ProductSales => product_sales::handle(question, table),
        Intent::TopProducts => top_products::handle(table),
        Intent::MonthlySales => monthly_sales::handle(question, table),
        Intent::GeneralQuery => general::handle(question, &columns, generator)?,
    };
    Ok((intent, outcome))
}
