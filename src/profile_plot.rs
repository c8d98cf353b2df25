/// SVG chart of the recorded elevation and its display-smoothed curve.
use std::path::Path;

use plotters::prelude::*;

use crate::error::{ProfileError, Result};

const CHART_SIZE: (u32, u32) = (1280, 720);

pub fn render_profile(elevations: &[f64], smoothed: &[f64], title: &str, path: &Path) -> Result<()> {
    if elevations.is_empty() {
        return Ok(());
    }

    draw_profile(elevations, smoothed, title, path).map_err(|e| ProfileError::Plot(e.to_string()))
}

fn draw_profile(
    elevations: &[f64],
    smoothed: &[f64],
    title: &str,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (y_min, y_max) = value_range(elevations.iter().chain(smoothed.iter()).copied());
    let x_max = (elevations.len().max(smoothed.len()).max(2) - 1) as f64;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Point")
        .y_desc("Elevation (m)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            elevations.iter().enumerate().map(|(i, &e)| (i as f64, e)),
            &BLUE,
        ))?
        .label("Recorded")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            smoothed.iter().enumerate().map(|(i, &e)| (i as f64, e)),
            &RED,
        ))?
        .label("Smoothed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Padded min/max over finite values; a flat profile still gets a visible band.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() {
        return (0.0, 1.0);
    }

    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad, max + pad)
}
