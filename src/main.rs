use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use rayon::prelude::*;

mod config;
mod error;
mod geodesic;
mod grade;
mod pipeline;
mod profile_plot;
mod route_reader;
mod step_generator;
mod step_merger;
mod step_printer;
mod trend_summarizer;

use config::{ProgramConfig, Unit, DEFAULT_PERCENT_COMBINE};
use pipeline::build_program;
use route_reader::{collect_gpx_files, read_route};

/// Gives a step-by-step guide to simulate the elevation of a route (saved as GPX) on a treadmill.
#[derive(Parser)]
#[command(name = "treadmill-profile", version, about)]
struct Cli {
    /// GPX file to analyze, or a folder of GPX files
    #[arg(short, long)]
    filename: PathBuf,

    /// Distance unit: "mi" or "km"
    #[arg(short, long, default_value = "mi")]
    unit: Unit,

    /// Do not render the elevation profile chart
    #[arg(long)]
    no_graph: bool,

    /// Minimum incline permitted
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    min_incline: i32,

    /// Maximum number of steps; no upper bound when omitted
    #[arg(short = 'n', long)]
    num_steps: Option<usize>,

    /// Steps whose inclines differ by less than this many points are combined
    #[arg(short, long, default_value_t = DEFAULT_PERCENT_COMBINE)]
    percent_combine: f64,

    /// Compact one-line-per-step output for reading on the treadmill
    #[arg(short, long)]
    step_print: bool,

    /// Folder for the steps CSV and profile chart
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn program_config(&self) -> ProgramConfig {
        ProgramConfig {
            unit: self.unit,
            min_incline: self.min_incline,
            max_steps: self.num_steps,
            percent_combine: self.percent_combine,
            step_print: self.step_print,
            graph: !self.no_graph,
            output_dir: self.output.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let config = cli.program_config();
    config.validate()?;

    let files = collect_gpx_files(&cli.filename)
        .with_context(|| format!("reading {}", cli.filename.display()))?;
    if files.is_empty() {
        bail!("no GPX files found in {}", cli.filename.display());
    }

    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    if let [single] = files.as_slice() {
        let text = process_route_file(single, &config)
            .with_context(|| format!("processing {}", single.display()))?;
        print!("{}", text);
        return Ok(());
    }

    info!(
        "Processing {} routes on {} cores",
        files.len(),
        num_cpus::get()
    );

    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, process_route_file(path, &config)))
        .collect();

    let mut failures = 0;
    for (path, result) in &results {
        println!("\n=== {} ===", path.display());
        match result {
            Ok(text) => print!("{}", text),
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    info!("{} routes processed, {} failed", results.len() - failures, failures);
    if failures == results.len() {
        bail!("every route failed to process");
    }

    Ok(())
}

/// Read, compute, write artifacts; returns the formatted program.
fn process_route_file(path: &Path, config: &ProgramConfig) -> error::Result<String> {
    let route = read_route(path)?;
    let program = build_program(&route.points, config)?;

    let steepest = program
        .grades
        .iter()
        .map(|g| g.grade_percent.abs())
        .fold(0.0, f64::max);
    debug!(
        "{}: {:.0}m recorded, window size {}, steepest segment {:.1}%",
        path.display(),
        program.total_distance_m,
        program.window_size,
        steepest
    );

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "route".to_string());

    if let Some(dir) = &config.output_dir {
        let csv_path = dir.join(format!("{}_steps.csv", stem));
        step_printer::save_steps_to_csv(&program.steps, &csv_path)?;
        debug!("Wrote {}", csv_path.display());
    }

    if config.graph {
        let svg_path = artifact_dir(path, config).join(format!("{}_profile.svg", stem));
        let title = route.name.as_deref().unwrap_or(&stem);
        profile_plot::render_profile(&program.elevations, &program.smoothed_profile, title, &svg_path)?;
        info!("Profile chart written to {}", svg_path.display());
    }

    Ok(step_printer::format_program(&program, config.step_print))
}

/// `--output` when given, else the folder holding the route file.
fn artifact_dir(path: &Path, config: &ProgramConfig) -> PathBuf {
    match &config.output_dir {
        Some(dir) => dir.clone(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SHORT_CLIMB: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><name>Short climb</name><trkseg>
    <trkpt lat="0.0" lon="0.0"><ele>100.0</ele></trkpt>
    <trkpt lat="0.0" lon="0.001"><ele>104.0</ele></trkpt>
    <trkpt lat="0.0" lon="0.002"><ele>109.0</ele></trkpt>
    <trkpt lat="0.0" lon="0.003"><ele>111.0</ele></trkpt>
  </trkseg></trk>
</gpx>
"#;

    #[test]
    fn test_default_config_writes_chart_next_to_route() {
        let dir = tempdir().unwrap();
        let route_path = dir.path().join("hill.gpx");
        fs::write(&route_path, SHORT_CLIMB).unwrap();

        let config = ProgramConfig::default();
        assert!(config.graph);
        assert!(config.output_dir.is_none());

        let text = process_route_file(&route_path, &config).unwrap();
        assert!(text.contains("Final Distance"));

        let chart = dir.path().join("hill_profile.svg");
        assert!(chart.exists());
        assert!(fs::read_to_string(&chart).unwrap().contains("<svg"));
        assert!(!dir.path().join("hill_steps.csv").exists());
    }

    #[test]
    fn test_output_folder_receives_both_artifacts() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let route_path = dir.path().join("hill.gpx");
        fs::write(&route_path, SHORT_CLIMB).unwrap();

        let config = ProgramConfig {
            output_dir: Some(out.clone()),
            ..ProgramConfig::default()
        };
        process_route_file(&route_path, &config).unwrap();

        assert!(out.join("hill_profile.svg").exists());
        assert!(out.join("hill_steps.csv").exists());
        assert!(!dir.path().join("hill_profile.svg").exists());
    }

    #[test]
    fn test_no_graph_writes_no_chart() {
        let dir = tempdir().unwrap();
        let route_path = dir.path().join("hill.gpx");
        fs::write(&route_path, SHORT_CLIMB).unwrap();

        let config = ProgramConfig {
            graph: false,
            ..ProgramConfig::default()
        };
        process_route_file(&route_path, &config).unwrap();
        assert!(!dir.path().join("hill_profile.svg").exists());
    }

    #[test]
    fn test_artifact_dir_for_bare_file_name() {
        let config = ProgramConfig::default();
        assert_eq!(artifact_dir(Path::new("hill.gpx"), &config), PathBuf::new());
        assert_eq!(
            artifact_dir(Path::new("routes/hill.gpx"), &config),
            PathBuf::from("routes")
        );
    }
}
