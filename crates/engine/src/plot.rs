//! Monthly sales series for a single product, ready to be charted.
//!
//! Only the data side lives here: which product, which points, where the
//! artifact goes. Writing the chart file is the io crate's job.

use std::path::{Path, PathBuf};

use crate::context::QuestionContext;
use crate::handlers::total_sales::{first_named, NO_SALES_DATA, PRODUCT_NOT_FOUND};
use crate::period::period_label;
use crate::table::Table;

/// File extension of the chart artifact.
pub const PLOT_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    /// Canonical period key, e.g. `2021-07`.
    pub period: String,
    /// Axis label, e.g. `Jul 2021`.
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub product: String,
    pub title: String,
    pub points: Vec<PlotPoint>,
    pub path: PathBuf,
}

impl PlotSeries {
    pub fn message(&self) -> String {
        format!("Sales plot generated for {}", self.product)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlotOutcome {
    NotFound(String),
    Ready(PlotSeries),
}

/// Replace spaces and path separators so a product name is a safe file stem.
pub fn sanitize_product_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

/// `{output_dir}/{sanitized}_sales.png`
pub fn plot_path(output_dir: &Path, product: &str) -> PathBuf {
    output_dir.join(format!(
        "{}_sales.{}",
        sanitize_product_name(product),
        PLOT_EXTENSION
    ))
}

/// Build the monthly series for the first product named in the question.
pub fn prepare(question: &QuestionContext, table: &Table, output_dir: &Path) -> PlotOutcome {
    let Some(row) = first_named(question, table) else {
        return PlotOutcome::NotFound(PRODUCT_NOT_FOUND.to_string());
    };

    let points: Vec<PlotPoint> = table
        .period_columns()
        .map(|(index, period)| PlotPoint {
            period: period.to_string(),
            label: period_label(period).unwrap_or_else(|| period.to_string()),
            value: row.values[index].summand(),
        })
        .collect();

    if points.is_empty() {
        return PlotOutcome::NotFound(NO_SALES_DATA.to_string());
    }

    PlotOutcome::Ready(PlotSeries {
        product: row.product_name.clone(),
        title: format!("Monthly Sales for {}", row.product_name),
        points,
        path: plot_path(output_dir, &row.product_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::table::PRODUCT_COLUMN;

    fn report() -> Table {
        let mut t = Table::new(
            PRODUCT_COLUMN,
            vec!["Region".into(), "2021-07".into(), "2021-08".into()],
        );
        t.push_row(
            "70mm Casement",
            vec![CellValue::Text("North".into()), CellValue::Number(12.0), CellValue::Text("-".into())],
        )
        .unwrap();
        t
    }

    #[test]
    fn test_sanitize_product_name() {
        assert_eq!(sanitize_product_name("70mm Casement"), "70mm_Casement");
        assert_eq!(sanitize_product_name("A/B\\C D"), "A_B_C_D");
        assert_eq!(sanitize_product_name("PC-1000"), "PC-1000");
    }

    #[test]
    fn test_plot_path() {
        assert_eq!(
            plot_path(Path::new("plots"), "70mm Casement"),
            PathBuf::from("plots/70mm_Casement_sales.png")
        );
    }

    #[test]
    fn test_prepare_uses_period_columns_only() {
        let q = QuestionContext::new("Show me monthly sales plot for 70mm casement");
        let PlotOutcome::Ready(series) = prepare(&q, &report(), Path::new("plots")) else {
            panic!("expected a series");
        };
        assert_eq!(series.title, "Monthly Sales for 70mm Casement");
        assert_eq!(series.message(), "Sales plot generated for 70mm Casement");
        assert_eq!(
            series.points,
            vec![
                PlotPoint { period: "2021-07".into(), label: "Jul 2021".into(), value: 12.0 },
                PlotPoint { period: "2021-08".into(), label: "Aug 2021".into(), value: 0.0 },
            ]
        );
        assert_eq!(series.path, PathBuf::from("plots/70mm_Casement_sales.png"));
    }

    #[test]
    fn test_prepare_unknown_product() {
        let q = QuestionContext::new("plot the widget");
        assert_eq!(
            prepare(&q, &report(), Path::new("plots")),
            PlotOutcome::NotFound(PRODUCT_NOT_FOUND.to_string())
        );
    }

    #[test]
    fn test_prepare_without_period_columns() {
        let mut t = Table::new(PRODUCT_COLUMN, vec!["Region".into()]);
        t.push_row("PC-1000", vec![CellValue::Text("North".into())]).unwrap();
        let q = QuestionContext::new("plot PC-1000");
        assert_eq!(
            prepare(&q, &t, Path::new("plots")),
            PlotOutcome::NotFound(NO_SALES_DATA.to_string())
        );
    }
}
