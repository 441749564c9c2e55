// Sales report I/O: loading reports into tables, exporting charts

pub mod chart;
pub mod csv;
pub mod headers;
pub mod report;
pub mod xlsx;

pub use chart::{write_line_chart, ExportError};
pub use report::{load_table, load_table_with_options, LoadOptions, ReportSource, DEFAULT_SHEET};
