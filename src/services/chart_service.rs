use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{CurvePoint, Dataset, FitKind, VisualizationMode};
use crate::services::regression_service;
use crate::utils::DemandError;

const BACKGROUND: RGBColor = RGBColor(0x1a, 0x1a, 0x1a);
const LEGEND_BACKGROUND: RGBColor = RGBColor(0x2d, 0x2d, 0x2d);
const AXIS: RGBColor = RGBColor(0x66, 0x66, 0x66);
const TEXT: RGBColor = RGBColor(0xcc, 0xcc, 0xcc);
const OBSERVED: RGBColor = RGBColor(0x99, 0x66, 0xcc);
const LINEAR_LINE: RGBColor = RGBColor(0x4c, 0xaf, 0x50);
const LOG_LINE: RGBColor = RGBColor(0xff, 0x6b, 0x6b);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Demand(#[from] DemandError),
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// Output settings for a rendered chart
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Samples per fitted curve
    pub curve_points: usize,
}

/// A fitted curve ready to draw
struct FittedCurve {
    kind: FitKind,
    r_squared: f64,
    points: Vec<CurvePoint>,
}

/// Dash and gap lengths in pixels; the log-log curve is dashed, the linear one solid
fn dash_pattern(kind: FitKind) -> Option<(u32, u32)> {
    match kind {
        FitKind::Linear => None,
        FitKind::Log => Some((10, 6)),
    }
}

/// Axis ranges covering every value with 10% padding
///
/// Degenerate spans get a unit of padding so the range is never empty. The y axis
/// stays non-negative when every value is.
pub fn plot_bounds(xs: &[f64], ys: &[f64]) -> (Range<f64>, Range<f64>) {
    (padded_range(xs, false), padded_range(ys, true))
}

fn padded_range(values: &[f64], floor_at_zero: bool) -> Range<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let span = max - min;
    let padding = if span > 0.0 { span * 0.1 } else { 1.0 };
    let mut lower = min - padding;
    if floor_at_zero && min >= 0.0 {
        lower = lower.max(0.0);
    }
    lower..max + padding
}

fn fitted_curves(
    dataset: &Dataset,
    mode: VisualizationMode,
    samples: usize,
) -> Result<Vec<FittedCurve>, DemandError> {
    let mut curves = Vec::new();

    if let Some(fit) = dataset.linear_fit().filter(|_| mode.includes(FitKind::Linear)) {
        curves.push(FittedCurve {
            kind: FitKind::Linear,
            r_squared: fit.r_squared,
            points: regression_service::curve_points(dataset, FitKind::Linear, samples)?,
        });
    }

    if let Some(fit) = dataset.log_fit().filter(|_| mode.includes(FitKind::Log)) {
        curves.push(FittedCurve {
            kind: FitKind::Log,
            r_squared: fit.r_squared,
            points: regression_service::curve_points(dataset, FitKind::Log, samples)?,
        });
    }

    Ok(curves)
}

/// Draw the observations and the fitted curves selected by `mode` as a PNG
///
/// Curves are only drawn for fits that exist; with no fits the chart is a plain scatter.
pub fn render_demand_chart(
    dataset: &Dataset,
    mode: VisualizationMode,
    options: &ChartOptions,
) -> Result<PathBuf, ChartError> {
    if !dataset.has_data() {
        return Err(DemandError::InsufficientData {
            required: 2,
            actual: dataset.len(),
        }
        .into());
    }

    let curves = fitted_curves(dataset, mode, options.curve_points)?;

    let mut ys: Vec<f64> = dataset.quantities().to_vec();
    for curve in &curves {
        ys.extend(curve.points.iter().map(|p| p.quantity));
    }
    let (x_range, y_range) = plot_bounds(dataset.prices(), &ys);

    debug!(
        "Rendering {} curves over x={:?}, y={:?}",
        curves.len(),
        x_range,
        y_range
    );

    draw(dataset, &curves, x_range, y_range, options).map_err(ChartError::Render)?;

    info!("🎨 Chart written to {}", options.path.display());
    Ok(options.path.clone())
}

fn draw(
    dataset: &Dataset,
    curves: &[FittedCurve],
    x_range: Range<f64>,
    y_range: Range<f64>,
    options: &ChartOptions,
) -> Result<(), String> {
    let path: &Path = &options.path;
    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&BACKGROUND)
        .map_err(|e| format!("Failed to fill canvas: {}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Demand Analysis",
            ("sans-serif", 28.0).into_font().color(&TEXT),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| format!("Failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .bold_line_style(&AXIS.mix(0.2))
        .light_line_style(&AXIS.mix(0.05))
        .axis_style(&AXIS)
        .label_style(("sans-serif", 14.0).into_font().color(&TEXT))
        .axis_desc_style(("sans-serif", 16.0).into_font().color(&TEXT))
        .x_desc("Price ($)")
        .y_desc("Volume (thousands)")
        .draw()
        .map_err(|e| format!("Failed to draw mesh: {}", e))?;

    chart
        .draw_series(
            dataset
                .prices()
                .iter()
                .zip(dataset.quantities())
                .map(|(&p, &q)| Circle::new((p, q), 6, OBSERVED.mix(0.8).filled())),
        )
        .map_err(|e| format!("Failed to draw points: {}", e))?
        .label("Observed")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, OBSERVED.filled()));

    for curve in curves {
        let color = match curve.kind {
            FitKind::Linear => LINEAR_LINE,
            FitKind::Log => LOG_LINE,
        };
        let label = match curve.kind {
            FitKind::Linear => format!("Linear (R²={:.3})", curve.r_squared),
            FitKind::Log => format!("Log-log (R²={:.3})", curve.r_squared),
        };

        let points = curve.points.iter().map(|p| (p.price, p.quantity));
        let style = color.stroke_width(2);
        let drawn = match dash_pattern(curve.kind) {
            Some((dash, gap)) => chart.draw_series(DashedLineSeries::new(points, dash, gap, style)),
            None => chart.draw_series(LineSeries::new(points, style)),
        };

        drawn
            .map_err(|e| format!("Failed to draw {} curve: {}", curve.kind, e))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&LEGEND_BACKGROUND)
        .border_style(&AXIS)
        .label_font(("sans-serif", 14.0).into_font().color(&TEXT))
        .draw()
        .map_err(|e| format!("Failed to draw legend: {}", e))?;

    root.present()
        .map_err(|e| format!("Failed to render chart: {}", e))?;

    Ok(())
}
