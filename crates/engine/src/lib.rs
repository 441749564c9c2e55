//! `salesq-engine`: answers questions about a sales report.
//!
//! Pure engine crate: receives a loaded [`Table`] and a [`TextGenerator`],
//! returns answers. No file formats, HTTP or CLI concerns.

pub mod cell;
pub mod context;
pub mod error;
pub mod generate;
pub mod handlers;
pub mod outcome;
pub mod period;
pub mod pipeline;
pub mod plot;
pub mod router;
pub mod table;

pub use cell::CellValue;
pub use context::QuestionContext;
pub use error::{GenerationError, HeaderError, LoadError, PipelineError, TableError};
pub use generate::{DisabledGenerator, TextGenerator};
pub use outcome::{Outcome, Payload};
pub use pipeline::{dispatch, Answer, Pipeline, TableLoader};
pub use plot::{PlotOutcome, PlotSeries};
pub use router::{classify, Intent};
pub use table::{Row, Table, PRODUCT_COLUMN, TOTAL_SALES_COLUMN};
