/// Collapse runs of consecutive steps with similar inclines.
///
/// A step joins the current run when its incline is within `threshold` incline
/// points of the incline that opened the run. The run keeps the opener's incline
/// and start position; only its distance grows.
use crate::step_generator::TreadmillStep;

pub fn combine_steps(steps: &[TreadmillStep], threshold: f64) -> Vec<TreadmillStep> {
    let mut run_incline = f64::INFINITY;
    let mut combined: Vec<TreadmillStep> = Vec::with_capacity(steps.len());

    for step in steps {
        if (step.incline_percent - run_incline).abs() < threshold {
            if let Some(last) = combined.last_mut() {
                last.distance += step.distance;
                continue;
            }
        }

        combined.push(TreadmillStep {
            step: combined.len() + 1,
            ..*step
        });
        run_incline = step.incline_percent;
    }

    combined
}

/// Distance at the end of the program: last start position plus its length.
pub fn final_distance(steps: &[TreadmillStep]) -> f64 {
    steps
        .last()
        .map(|s| s.cumulative_distance + s.distance)
        .unwrap_or(0.0)
}
