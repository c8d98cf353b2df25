/// Trend Summarizer - reduce a long, noisy elevation signal to a handful of
/// representative (distance, slope) windows.
///
/// Two independent paths share the window size:
/// - an order-1 Savitzky-Golay curve over the raw signal, for plotting only
/// - non-overlapping fixed-count windows, each reduced to a least-squares slope
///   against cumulative distance
use log::debug;

use crate::config::DEFAULT_WINDOW_SIZE;
use crate::error::{ProfileError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendWindow {
    pub start_index: usize,
    pub distance_span_m: f64,
    pub slope_percent: f64,
}

#[derive(Debug, Clone)]
pub struct TrendSummary {
    pub window_size: usize,
    pub smoothed: Vec<f64>,
    pub windows: Vec<TrendWindow>,
}

/// Samples per window: `round(samples / max_steps)` when bounded, else the 21-sample default.
/// Exact halves round to even. Never below 2, since a slope needs two points.
pub fn window_size_for(sample_count: usize, max_steps: Option<usize>) -> usize {
    match max_steps {
        Some(steps) if steps > 0 => {
            let size = (sample_count as f64 / steps as f64).round_ties_even() as usize;
            size.max(2)
        }
        _ => DEFAULT_WINDOW_SIZE,
    }
}

pub fn summarize_trend(
    cumulative_distance: &[f64],
    signal: &[f64],
    window_size: usize,
) -> Result<TrendSummary> {
    if window_size < 2 {
        return Err(ProfileError::Config(format!(
            "window size must be at least 2, got {}",
            window_size
        )));
    }
    if cumulative_distance.len() != signal.len() {
        return Err(ProfileError::MalformedInput(format!(
            "{} distances for {} signal values",
            cumulative_distance.len(),
            signal.len()
        )));
    }

    let smoothed = savitzky_golay_linear(signal, window_size);

    let n = signal.len();
    let mut windows = Vec::new();
    let mut start = 0;

    while start + window_size < n {
        let end = start + window_size;
        let (slope, _) = linear_fit(&cumulative_distance[start..end], &signal[start..end]);

        let window = TrendWindow {
            start_index: start,
            distance_span_m: cumulative_distance[end] - cumulative_distance[start],
            slope_percent: slope * 100.0,
        };
        debug!(
            "Window @{}: {:.1}m at {:.2}%",
            window.start_index, window.distance_span_m, window.slope_percent
        );
        windows.push(window);

        start = end;
    }

    debug!(
        "Trend: {} samples, window size {}, {} windows ({} trailing samples dropped)",
        n,
        window_size,
        windows.len(),
        n.saturating_sub(windows.len() * window_size)
    );

    Ok(TrendSummary {
        window_size,
        smoothed,
        windows,
    })
}

/// Least-squares line through `(x, y)`; returns `(slope, intercept)`.
/// A window with no spread in `x` has slope 0.
pub fn linear_fit(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len().min(y.len());
    if n == 0 {
        return (0.0, 0.0);
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x[..n].iter().zip(&y[..n]) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }

    if sxx <= 0.0 || !sxx.is_finite() {
        return (0.0, mean_y);
    }

    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}

/// Order-1 Savitzky-Golay smoothing over sample index.
///
/// Each output is the fitted line of its centred window evaluated at that index.
/// At the edges the window is shifted to stay inside the data.
pub fn savitzky_golay_linear(signal: &[f64], window_size: usize) -> Vec<f64> {
    let n = signal.len();
    if n < 2 || window_size < 2 {
        return signal.to_vec();
    }

    let len = window_size.min(n);
    let half = (len - 1) / 2;
    let positions: Vec<f64> = (0..n).map(|i| i as f64).collect();

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half).min(n - len);
            let end = start + len;
            let (slope, intercept) = linear_fit(&positions[start..end], &signal[start..end]);
            slope * i as f64 + intercept
        })
        .collect()
}
