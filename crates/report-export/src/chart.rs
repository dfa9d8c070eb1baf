use std::path::Path;

use bell_curve::DistributionModel;
use plotters::prelude::*;

use crate::error::ExportError;

pub const CHART_TITLE: &str = "Bell Curve with Standard Deviations and Categories";
pub const X_AXIS_LABEL: &str = "Final Average";
pub const Y_AXIS_LABEL: &str = "Probability Density";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
        }
    }
}

/// Render the distribution model to an SVG file.
pub fn render_bell_curve(
    model: &DistributionModel,
    path: &Path,
    options: &ChartOptions,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    draw(model, path, options).map_err(|e| ExportError::Chart(e.to_string()))?;

    tracing::info!(
        "Rendered bell curve for {} funds to {}",
        model.points.len(),
        path.display()
    );
    Ok(())
}

/// X range covering the 3-sigma span and every fund, padded slightly.
fn x_range(model: &DistributionModel) -> (f64, f64) {
    if model.is_degenerate() {
        let lo = model.points.iter().map(|p| p.x).fold(model.mean, f64::min);
        let hi = model.points.iter().map(|p| p.x).fold(model.mean, f64::max);
        return (lo - 0.5, hi + 0.5);
    }

    let (lo, hi) = model
        .points
        .iter()
        .map(|p| p.x)
        .chain(model.curve.iter().map(|c| c.x))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn y_top(model: &DistributionModel) -> f64 {
    let peak = model.peak_density();
    if peak > 0.0 && peak.is_finite() {
        // Headroom for the labels above the points
        peak * 1.15
    } else {
        1.0
    }
}

fn draw(
    model: &DistributionModel,
    path: &Path,
    options: &ChartOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = x_range(model);
    let y_hi = y_top(model);
    let peak = model.peak_density();

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 26))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .draw()?;

    // Shaded bands, widest first so the narrower ones stack on top
    let band_colors = [BLUE, GREEN, RED];
    for (band, color) in model.bands.iter().zip(band_colors) {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(band.lower, 0.0), (band.upper, peak)],
            color.mix(0.2).filled(),
        )))?;
    }

    for (_, x) in model.sigma_lines() {
        chart.draw_series(LineSeries::new(
            vec![(x, 0.0), (x, peak)],
            BLACK.mix(0.5).stroke_width(1),
        ))?;
    }

    chart
        .draw_series(LineSeries::new(
            model.curve.iter().map(|p| (p.x, p.density)),
            BLUE.stroke_width(2),
        ))?
        .label("Bell Curve")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(model.points.iter().map(|p| {
            let color = if p.highlight { GREEN } else { RED };
            EmptyElement::at((p.x, p.y))
                + Circle::new((0, 0), 6, color.filled())
                + Text::new(p.fund.clone(), (-12, -20), ("sans-serif", 13).into_font())
        }))?
        .label("Data Points")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));

    chart
        .draw_series(std::iter::once(Cross::new(
            (model.mean_marker.x, model.mean_marker.density),
            8,
            BLACK.stroke_width(2),
        )))?
        .label(format!("Mean: {:.2}", model.mean))
        .legend(|(x, y)| Cross::new((x + 10, y), 5, BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
