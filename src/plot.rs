//! SVG plots of a matrix comparison: correlation scatter and Bland–Altman.

use crate::compare::{BiasAnalysis, MatrixComparison};
use crate::config::PlotSettings;
use crate::error::{FidelityError, Result};
use plotters::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub const CORRELATION_PLOT_FILE: &str = "correlation_plot.svg";
pub const BLAND_ALTMAN_PLOT_FILE: &str = "bland_altman_plot.svg";

fn plot_err<E: Display>(e: E) -> FidelityError {
    FidelityError::Plot(e.to_string())
}

/// Min/max of the values with 5% padding; never an empty range
fn padded_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.01 };
    (lo - pad, hi + pad)
}

/// Candidate vs reference distances with the y = x line
pub fn correlation_plot(cmp: &MatrixComparison, path: &Path, size: (u32, u32)) -> Result<()> {
    let pairs = &cmp.pairs;
    let (lo, hi) = padded_range(pairs.reference.iter().chain(pairs.candidate.iter()));

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let caption = format!("Reference vs Candidate (Pearson r = {:.4})", cmp.pearson);
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, lo..hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Reference distance")
        .y_desc("Candidate distance")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            pairs
                .reference
                .iter()
                .zip(&pairs.candidate)
                .map(|(r, c)| Circle::new((*r, *c), 2, BLUE.mix(0.5).filled())),
        )
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(vec![(lo, lo), (hi, hi)], RED.stroke_width(2)))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Correlation plot written to {}", path.display());
    Ok(())
}

/// Differences against pair means with bias and limits-of-agreement lines
pub fn bland_altman_plot(cmp: &MatrixComparison, path: &Path, size: (u32, u32)) -> Result<()> {
    let means = cmp.pairs.pair_means();
    let diffs = cmp.pairs.signed_differences();
    let BiasAnalysis {
        mean_diff,
        lower_loa,
        upper_loa,
        ..
    } = cmp.bias;

    let (x_lo, x_hi) = padded_range(means.iter());
    let bounds = [mean_diff, lower_loa, upper_loa];
    let (y_lo, y_hi) = padded_range(diffs.iter().chain(bounds.iter()));

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Bland-Altman Plot", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Mean of reference and candidate")
        .y_desc("Reference - Candidate")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            means
                .iter()
                .zip(&diffs)
                .map(|(m, d)| Circle::new((*m, *d), 2, BLUE.mix(0.5).filled())),
        )
        .map_err(plot_err)?;

    let hline = |y: f64| vec![(x_lo, y), (x_hi, y)];
    chart
        .draw_series(LineSeries::new(hline(mean_diff), RED.stroke_width(2)))
        .map_err(plot_err)?
        .label(format!("Mean: {:.6}", mean_diff))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .draw_series(LineSeries::new(hline(upper_loa), GREEN.stroke_width(1)))
        .map_err(plot_err)?
        .label(format!("+1.96 SD: {:.6}", upper_loa))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    chart
        .draw_series(LineSeries::new(hline(lower_loa), GREEN.stroke_width(1)))
        .map_err(plot_err)?
        .label(format!("-1.96 SD: {:.6}", lower_loa))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Bland-Altman plot written to {}", path.display());
    Ok(())
}

/// Render both plots into `dir`, returning their paths
pub fn write_plots(cmp: &MatrixComparison, dir: &Path, settings: &PlotSettings) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let size = (settings.width, settings.height);
    let correlation = dir.join(CORRELATION_PLOT_FILE);
    let bland_altman = dir.join(BLAND_ALTMAN_PLOT_FILE);
    correlation_plot(cmp, &correlation, size)?;
    bland_altman_plot(cmp, &bland_altman, size)?;
    Ok(vec![correlation, bland_altman])
}
