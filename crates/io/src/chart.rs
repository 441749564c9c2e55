// Line chart export for a product's monthly sales

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use salesq_engine::PlotSeries;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Image size in pixels (a 10x5 inch figure at 100 dpi).
pub const CHART_SIZE: (u32, u32) = (1000, 500);

/// TrueType font used for the title and axis labels.
pub const FONT_ENV: &str = "SALESQ_PLOT_FONT";

const X_AXIS: &str = "Month";
const Y_AXIS: &str = "Sales Amount";
const FONT_FAMILY: &str = "sans-serif";

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create {path}: {message}")]
    Io { path: String, message: String },
    #[error("cannot render chart: {0}")]
    Render(String),
}

fn render_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Render(e.to_string())
}

/// Register a font for chart text once per process. False when none of the
/// candidates could be loaded; charts are then drawn without text.
fn text_available() -> bool {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    *REGISTERED.get_or_init(|| {
        let from_env = std::env::var_os(FONT_ENV).map(PathBuf::from);
        let candidates = from_env
            .into_iter()
            .chain(FONT_CANDIDATES.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            // plotters keeps registered fonts for the life of the process
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
                debug!(font = %path.display(), "chart font registered");
                return true;
            }
        }
        warn!("no usable TrueType font found (set {}); chart has no text", FONT_ENV);
        false
    })
}

/// Value axis bounds: always includes zero, with headroom above the peak.
fn value_range(values: &[f64]) -> (f64, f64) {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let min = values.iter().copied().fold(0.0_f64, f64::min);
    let top = if max > 0.0 { max * 1.1 } else { 1.0 };
    let bottom = if min < 0.0 { min * 1.1 } else { 0.0 };
    (bottom, top)
}

fn create_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| ExportError::Io {
                path: parent.display().to_string(),
                message: e.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Render the series as a PNG line chart with circle markers at
/// `series.path`. Creates the output directory if needed.
pub fn write_line_chart(series: &PlotSeries) -> Result<PathBuf, ExportError> {
    create_parent(&series.path)?;

    let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    let count = values.len() as i32;
    let (y_min, y_max) = value_range(&values);
    let with_text = text_available();

    let root = BitMapBackend::new(&series.path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20).x_label_area_size(70).y_label_area_size(80);
    if with_text {
        builder.caption(&series.title, (FONT_FAMILY, 24));
    }
    let mut chart = builder
        .build_cartesian_2d((0..count).into_segmented(), y_min..y_max)
        .map_err(render_err)?;

    let format_month = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).map(|s| s.to_string()).unwrap_or_default(),
        _ => String::new(),
    };
    let mut mesh = chart.configure_mesh();
    if with_text {
        mesh.x_labels(labels.len())
            .x_label_formatter(&format_month)
            .x_label_style((FONT_FAMILY, 14))
            .x_desc(X_AXIS)
            .y_desc(Y_AXIS);
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw().map_err(render_err)?;

    let coords: Vec<(SegmentValue<i32>, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (SegmentValue::CenterOf(i as i32), *v))
        .collect();
    chart
        .draw_series(LineSeries::new(coords.clone(), BLUE.stroke_width(2)))
        .map_err(render_err)?;
    chart
        .draw_series(coords.into_iter().map(|c| Circle::new(c, 5, BLUE.filled())))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;

    info!(path = %series.path.display(), points = series.points.len(), "wrote sales chart");
    Ok(series.path.clone())
}
