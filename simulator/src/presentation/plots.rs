use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{info, warn};

use crate::analysis::aggregator::AggregateView;
use crate::analysis::distribution::DistributionSummary;
use crate::config::constants::{PLOT_HEIGHT, PLOT_WIDTH, SCATTER_ALPHA};
use crate::models::result_table::ResultTable;
use crate::utils::logging::{self, OperationCategory, PresentationType};

pub type PlotResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Axis bounds covering `values`, padded by 2% (or by 1.0 when degenerate).
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { 0.02 * (hi - lo) } else { 1.0 };
    (lo - pad, hi + pad)
}

/// Mean effectiveness per illumination group, with the 75% reference line and
/// the mean image quality drawn as horizontal lines.
pub fn render_effectiveness_by_illumination(
    out_path: &Path,
    view: &AggregateView,
    reference_line: f64,
) -> PlotResult<()> {
    let points: Vec<(f64, f64)> = view
        .groups
        .iter()
        .map(|g| (g.illumination, g.mean_effectiveness))
        .collect();
    let (x_lo, x_hi) = padded_range(points.iter().map(|p| p.0));

    let root = SVGBackend::new(out_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Facial Recognition Effectiveness (Monte Carlo)", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0f64..1.05f64)?;

    chart
        .configure_mesh()
        .x_desc("Illumination (lux)")
        .y_desc("Recognition effectiveness")
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.clone(), &BLUE))?
        .label("Mean effectiveness")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())))?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x_lo, reference_line), (x_hi, reference_line)],
            RED,
        )))?
        .label(format!("Effectiveness line {:.0}%", reference_line * 100.0))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x_lo, view.mean_quality), (x_hi, view.mean_quality)],
            GREEN,
        )))?
        .label("Mean image quality")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Scatter of one input column against effectiveness.
pub fn render_scatter(
    out_path: &Path,
    title: &str,
    x_desc: &str,
    points: &[(f64, f64)],
) -> PlotResult<()> {
    let (x_lo, x_hi) = padded_range(points.iter().map(|p| p.0));

    let root = SVGBackend::new(out_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0f64..1.05f64)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Effectiveness")
        .draw()?;

    let style = BLUE.mix(SCATTER_ALPHA).filled();
    chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 2, style)))?;

    root.present()?;
    Ok(())
}

/// Histogram bars with the scaled density curve on top.
pub fn render_distribution(out_path: &Path, summary: &DistributionSummary) -> PlotResult<()> {
    let histogram = &summary.histogram;
    let x_lo = histogram.bins.first().map(|b| b.lower).unwrap_or(0.0);
    let x_hi = histogram.bins.last().map(|b| b.upper).unwrap_or(1.0);
    let overlay_peak = summary.density_overlay.iter().map(|p| p.1).fold(0.0, f64::max);
    let y_max = (histogram.max_count() as f64).max(overlay_peak).max(1.0) * 1.1;

    let root = SVGBackend::new(out_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Effectiveness Distribution", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Effectiveness")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(histogram.bins.iter().map(|bin| {
        Rectangle::new([(bin.lower, 0.0), (bin.upper, bin.count as f64)], BLUE.mix(0.5).filled())
    }))?;
    chart.draw_series(histogram.bins.iter().map(|bin| {
        Rectangle::new([(bin.lower, 0.0), (bin.upper, bin.count as f64)], BLACK.mix(0.6))
    }))?;

    if !summary.density_overlay.is_empty() {
        chart.draw_series(LineSeries::new(summary.density_overlay.iter().copied(), &RED))?;
    }

    root.present()?;
    Ok(())
}

/// Renders every chart into `out_dir` and returns the written paths.
pub fn render_all(
    out_dir: &Path,
    table: &ResultTable,
    view: &AggregateView,
    distribution: Option<&DistributionSummary>,
    reference_line: f64,
) -> PlotResult<Vec<PathBuf>> {
    let _timing = logging::start_timing("render_all",
        OperationCategory::Presentation { subcategory: PresentationType::Plot });
    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();

    let path = out_dir.join("effectiveness_by_illumination.svg");
    render_effectiveness_by_illumination(&path, view, reference_line)?;
    written.push(path);

    let illumination: Vec<(f64, f64)> = table.iter().map(|s| (s.illumination(), s.effectiveness())).collect();
    let path = out_dir.join("illumination_vs_effectiveness.svg");
    render_scatter(&path, "Illumination vs Effectiveness", "Illumination", &illumination)?;
    written.push(path);

    let quality: Vec<(f64, f64)> = table.iter().map(|s| (s.quality(), s.effectiveness())).collect();
    let path = out_dir.join("quality_vs_effectiveness.svg");
    render_scatter(&path, "Image Quality vs Effectiveness", "Image quality", &quality)?;
    written.push(path);

    match distribution {
        Some(summary) => {
            let path = out_dir.join("effectiveness_distribution.svg");
            render_distribution(&path, summary)?;
            written.push(path);
        }
        None => warn!("no effectiveness distribution available, skipping histogram"),
    }

    info!(plots = written.len(), dir = %out_dir.display(), "rendered plots");
    Ok(written)
}
