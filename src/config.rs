/// Run configuration for the treadmill profile pipeline.
///
/// Built once by the CLI, validated, then passed by reference into every stage.
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ProfileError, Result};

pub const DEFAULT_WINDOW_SIZE: usize = 21;
pub const DEFAULT_PERCENT_COMBINE: f64 = 2.0;

const METERS_PER_MILE: f64 = 1609.0;
const METERS_PER_KILOMETER: f64 = 1000.0;

/// Distance unit for the printed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Miles,
    Kilometers,
}

impl Unit {
    pub fn convert(self, meters: f64) -> f64 {
        match self {
            Unit::Miles => meters / METERS_PER_MILE,
            Unit::Kilometers => meters / METERS_PER_KILOMETER,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Miles => "mi",
            Unit::Kilometers => "km",
        }
    }
}

impl FromStr for Unit {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mi" => Ok(Unit::Miles),
            "km" => Ok(Unit::Kilometers),
            other => Err(ProfileError::Config(format!(
                "unknown unit '{}', expected 'mi' or 'km'",
                other
            ))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Settings the step generator needs from the run configuration.
#[derive(Debug, Clone, Copy)]
pub struct StepOptions {
    pub unit: Unit,
    pub min_incline: f64,
}

#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub unit: Unit,
    pub min_incline: i32,
    pub max_steps: Option<usize>,
    pub percent_combine: f64,
    pub step_print: bool,
    pub graph: bool,
    pub output_dir: Option<PathBuf>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        ProgramConfig {
            unit: Unit::Miles,
            min_incline: 0,
            max_steps: None,
            percent_combine: DEFAULT_PERCENT_COMBINE,
            step_print: false,
            graph: true,
            output_dir: None,
        }
    }
}

impl ProgramConfig {
    /// Rejects settings that would otherwise surface mid-pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == Some(0) {
            return Err(ProfileError::Config(
                "maximum number of steps must be positive".to_string(),
            ));
        }

        if !self.percent_combine.is_finite() || self.percent_combine < 0.0 {
            return Err(ProfileError::Config(format!(
                "combine threshold must be a non-negative number, got {}",
                self.percent_combine
            )));
        }

        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(ProfileError::Config(format!(
                    "output path {} is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    pub fn step_options(&self) -> StepOptions {
        StepOptions {
            unit: self.unit,
            min_incline: f64::from(self.min_incline),
        }
    }
}
