/// Route points in, treadmill program out.
///
/// distances -> grades -> trend windows -> steps -> merged steps
use log::{debug, info};

use crate::config::{ProgramConfig, Unit};
use crate::error::{ProfileError, Result};
use crate::geodesic::{cumulative_distances, RoutePoint};
use crate::grade::{calculate_grades, GradeSample};
use crate::step_generator::{generate_treadmill_steps, TreadmillStep};
use crate::step_merger::{combine_steps, final_distance};
use crate::trend_summarizer::{summarize_trend, window_size_for};

#[derive(Debug, Clone)]
pub struct TreadmillProgram {
    pub unit: Unit,
    pub steps: Vec<TreadmillStep>,
    pub final_distance: f64,
    pub window_size: usize,
    pub total_distance_m: f64,
    pub grades: Vec<GradeSample>,
    pub elevations: Vec<f64>,
    pub smoothed_profile: Vec<f64>,
}

pub fn build_program(points: &[RoutePoint], config: &ProgramConfig) -> Result<TreadmillProgram> {
    config.validate()?;

    if points.len() < 2 {
        return Err(ProfileError::MalformedInput(format!(
            "need at least 2 points with elevation, found {}",
            points.len()
        )));
    }
    if let Some(i) = points.iter().position(|p| {
        !(p.latitude().is_finite() && p.longitude().is_finite() && p.elevation.is_finite())
    }) {
        return Err(ProfileError::MalformedInput(format!(
            "point {} has a non-finite coordinate or elevation",
            i
        )));
    }

    let cumulative = cumulative_distances(points);
    let grades = calculate_grades(points, &cumulative)?;
    let elevations: Vec<f64> = points.iter().map(|p| p.elevation).collect();

    let window_size = window_size_for(cumulative.len(), config.max_steps);
    let trend = summarize_trend(&cumulative, &elevations, window_size)?;

    let steps = generate_treadmill_steps(&trend.windows, &config.step_options());
    let combined = combine_steps(&steps, config.percent_combine);

    debug!(
        "{} windows -> {} steps after combining within {}",
        trend.windows.len(),
        combined.len(),
        config.percent_combine
    );

    let total_distance_m = cumulative.last().copied().unwrap_or(0.0);
    info!(
        "Route: {} points, {:.2}{} recorded, window size {}, {} steps",
        points.len(),
        config.unit.convert(total_distance_m),
        config.unit,
        window_size,
        combined.len()
    );

    Ok(TreadmillProgram {
        unit: config.unit,
        final_distance: final_distance(&combined),
        steps: combined,
        window_size: trend.window_size,
        total_distance_m,
        grades,
        elevations,
        smoothed_profile: trend.smoothed,
    })
}
