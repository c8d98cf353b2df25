/// Console and CSV output for a treadmill program.
use std::fmt::Write as _;
use std::path::Path;

use csv::Writer;

use crate::config::Unit;
use crate::error::Result;
use crate::pipeline::TreadmillProgram;
use crate::step_generator::TreadmillStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Hill,
    Downhill,
    Flat,
}

impl Terrain {
    pub fn from_incline(incline_percent: f64) -> Self {
        if incline_percent > 1.0 {
            Terrain::Hill
        } else if incline_percent < -1.0 {
            Terrain::Downhill
        } else {
            Terrain::Flat
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Terrain::Hill => "Hill",
            Terrain::Downhill => "Downhill",
            Terrain::Flat => "Flat",
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

/// Shortest round-trip decimal that always carries a fractional part (`2.0`, `0.42`).
fn decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Multi-line listing, one block per step, followed by the final distance.
pub fn format_steps(steps: &[TreadmillStep], unit: Unit) -> String {
    let mut out = String::new();

    for (i, step) in steps.iter().enumerate() {
        let terrain = Terrain::from_incline(step.incline_percent);
        let _ = writeln!(out, "Step {} ({})", i + 1, terrain.label());
        let _ = writeln!(out, "\tIncline : {}%", decimal(step.incline_percent));
        let _ = writeln!(out, "\tStep Distance: {}{}", decimal(round_to(step.distance, 2)), unit);
        let _ = writeln!(
            out,
            "\tStart this step at: {}{}",
            decimal(round_to(step.cumulative_distance, 2)),
            unit
        );
    }

    out.push_str(&format_final_distance(steps, unit));
    out
}

/// One line per step, meant for glancing at while running.
pub fn format_step_print(steps: &[TreadmillStep], unit: Unit) -> String {
    let mut out = String::new();

    for (i, step) in steps.iter().enumerate() {
        let terrain = Terrain::from_incline(step.incline_percent);
        let _ = writeln!(
            out,
            "{} / {} ({}): At {}{}, set to incline {}%",
            i + 1,
            steps.len(),
            terrain.label(),
            decimal(round_to(step.cumulative_distance, 2)),
            unit,
            decimal(step.incline_percent)
        );
    }

    out.push_str(&format_final_distance(steps, unit));
    out
}

fn format_final_distance(steps: &[TreadmillStep], unit: Unit) -> String {
    let final_distance = crate::step_merger::final_distance(steps);
    format!("Final Distance: {}{}\n", decimal(round_to(final_distance, 1)), unit)
}

pub fn format_program(program: &TreadmillProgram, step_print: bool) -> String {
    if step_print {
        format_step_print(&program.steps, program.unit)
    } else {
        format_steps(&program.steps, program.unit)
    }
}

pub fn save_steps_to_csv(steps: &[TreadmillStep], csv_path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(csv_path)?;
    for step in steps {
        wtr.serialize(step)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_steps() -> Vec<TreadmillStep> {
        vec![
            TreadmillStep {
                step: 1,
                incline_percent: 3.5,
                distance: 0.4213,
                cumulative_distance: 0.0,
            },
            TreadmillStep {
                step: 2,
                incline_percent: -2.0,
                distance: 1.0,
                cumulative_distance: 0.4213,
            },
            TreadmillStep {
                step: 3,
                incline_percent: 0.5,
                distance: 0.25,
                cumulative_distance: 1.4213,
            },
        ]
    }

    #[test]
    fn test_terrain_labels() {
        assert_eq!(Terrain::from_incline(1.5), Terrain::Hill);
        assert_eq!(Terrain::from_incline(1.0), Terrain::Flat);
        assert_eq!(Terrain::from_incline(-1.0), Terrain::Flat);
        assert_eq!(Terrain::from_incline(-1.5), Terrain::Downhill);
    }

    #[test]
    fn test_detailed_format() {
        let text = format_steps(&sample_steps(), Unit::Miles);
        let expected = "Step 1 (Hill)\n\tIncline : 3.5%\n\tStep Distance: 0.42mi\n\tStart this step at: 0.0mi\n";
        assert!(text.starts_with(expected), "got:\n{}", text);
        assert!(text.contains("Step 2 (Downhill)\n\tIncline : -2.0%"));
        assert!(text.contains("\tStart this step at: 1.42mi\n"));
        assert!(text.ends_with("Final Distance: 1.7mi\n"));
    }

    #[test]
    fn test_step_print_format() {
        let text = format_step_print(&sample_steps(), Unit::Kilometers);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1 / 3 (Hill): At 0.0km, set to incline 3.5%");
        assert_eq!(lines[2], "3 / 3 (Flat): At 1.42km, set to incline 0.5%");
        assert_eq!(lines[3], "Final Distance: 1.7km");
    }

    #[test]
    fn test_whole_numbers_keep_a_decimal_place() {
        let steps = vec![
            TreadmillStep {
                step: 1,
                incline_percent: 2.0,
                distance: 1.0,
                cumulative_distance: 0.0,
            },
            TreadmillStep {
                step: 2,
                incline_percent: 0.0,
                distance: 2.0,
                cumulative_distance: 1.0,
            },
        ];
        let text = format_steps(&steps, Unit::Miles);
        assert!(text.starts_with("Step 1 (Hill)\n\tIncline : 2.0%\n\tStep Distance: 1.0mi\n\tStart this step at: 0.0mi\n"), "got:\n{}", text);
        assert!(text.contains("Step 2 (Flat)\n\tIncline : 0.0%\n\tStep Distance: 2.0mi\n\tStart this step at: 1.0mi\n"));
        assert!(text.ends_with("Final Distance: 3.0mi\n"));

        let compact = format_step_print(&steps, Unit::Kilometers);
        assert_eq!(compact.lines().nth(1), Some("2 / 2 (Flat): At 1.0km, set to incline 0.0%"));
    }

    #[test]
    fn test_decimal_places_round_half_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(decimal(round_to(0.4213, 2)), "0.42");
    }

    #[test]
    fn test_empty_program_prints_zero_distance() {
        assert_eq!(format_steps(&[], Unit::Miles), "Final Distance: 0.0mi\n");
    }

    #[test]
    fn test_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.csv");
        save_steps_to_csv(&sample_steps(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("step,incline_percent,distance,cumulative_distance"));
        assert_eq!(lines.next(), Some("1,3.5,0.4213,0.0"));
        assert_eq!(written.lines().count(), 4);
    }
}
