/// Percent grade between consecutive route points.
use log::debug;

use crate::error::{ProfileError, Result};
use crate::geodesic::RoutePoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeSample {
    pub grade_percent: f64,
    pub segment_distance_m: f64,
}

/// One sample per consecutive pair. Zero-length segments (repeated fixes) get a 0% grade.
pub fn calculate_grades(points: &[RoutePoint], cumulative_distance: &[f64]) -> Result<Vec<GradeSample>> {
    if points.len() != cumulative_distance.len() {
        return Err(ProfileError::MalformedInput(format!(
            "{} distances for {} points",
            cumulative_distance.len(),
            points.len()
        )));
    }

    let mut grades = Vec::with_capacity(points.len().saturating_sub(1));

    for i in 1..points.len() {
        let segment_distance_m = cumulative_distance[i] - cumulative_distance[i - 1];
        let rise = points[i].elevation - points[i - 1].elevation;

        let grade_percent = if segment_distance_m > 0.0 && segment_distance_m.is_finite() {
            100.0 * rise / segment_distance_m
        } else {
            debug!("Pt {}: zero-length segment, grade set to 0%", i);
            0.0
        };

        debug!("Pt {}\tGrade: {}%", i, grade_percent);

        grades.push(GradeSample {
            grade_percent,
            segment_distance_m,
        });
    }

    Ok(grades)
}
