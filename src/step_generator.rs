/// Turns trend windows into treadmill steps with half-percent incline settings.
use serde::Serialize;

use crate::config::StepOptions;
use crate::trend_summarizer::TrendWindow;

pub const INCLINE_INCREMENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreadmillStep {
    pub step: usize,
    pub incline_percent: f64,
    /// Length of this step in the configured unit.
    pub distance: f64,
    /// Distance covered before this step starts, in the configured unit.
    pub cumulative_distance: f64,
}

/// Round to the nearest treadmill increment (halves to even), then apply the floor.
pub fn quantize_incline(slope_percent: f64, min_incline: f64) -> f64 {
    let quantized = (slope_percent / INCLINE_INCREMENT).round_ties_even() * INCLINE_INCREMENT;
    // slight declines round to -0.0
    let quantized = if quantized == 0.0 { 0.0 } else { quantized };
    quantized.max(min_incline)
}

pub fn generate_treadmill_steps(windows: &[TrendWindow], options: &StepOptions) -> Vec<TreadmillStep> {
    let mut steps = Vec::with_capacity(windows.len());
    let mut covered_m = 0.0;

    for (i, window) in windows.iter().enumerate() {
        steps.push(TreadmillStep {
            step: i + 1,
            incline_percent: quantize_incline(window.slope_percent, options.min_incline),
            distance: options.unit.convert(window.distance_span_m),
            cumulative_distance: options.unit.convert(covered_m),
        });
        covered_m += window.distance_span_m;
    }

    steps
}
