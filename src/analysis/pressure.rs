// analysis/pressure.rs
// Wall pressure from discrete collision impulses

use serde::Serialize;

use super::stats::{mean, std_dev};
use crate::error::{AnalysisError, Result};
use crate::geometry::Container;
use crate::io::{BoxSide, WallCollision};
use crate::profile_scope;

/// Pressure per box on a uniform time grid. `times[i]` is the left edge of
/// bin `i`, which spans `[times[i], times[i] + dt)`.
#[derive(Debug, Clone, Serialize)]
pub struct PressureSeries {
    pub dt: f64,
    pub times: Vec<f64>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl PressureSeries {
    pub fn side(&self, side: BoxSide) -> &[f64] {
        match side {
            BoxSide::Left => &self.left,
            BoxSide::Right => &self.right,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Bin edges `0, dt, 2dt, ...` with the last edge at or beyond `t_max`.
pub fn bin_edges(t_max: f64, dt: f64) -> Vec<f64> {
    let count = ((t_max + dt) / dt).ceil();
    if !(count.is_finite() && count > 0.0) {
        return Vec::new();
    }
    (0..count as usize).map(|i| i as f64 * dt).collect()
}

/// Sum `weights` into the bins delimited by `edges`. Bins are half-open
/// except the last one, which also takes samples equal to the final edge.
/// Samples outside the edges are ignored.
pub fn weighted_histogram(samples: &[(f64, f64)], edges: &[f64]) -> Vec<f64> {
    let bins = edges.len().saturating_sub(1);
    let mut sums = vec![0.0; bins];
    if bins == 0 {
        return sums;
    }
    let lo = edges[0];
    let hi = edges[bins];
    let width = (hi - lo) / bins as f64;

    for &(t, w) in samples {
        if !(t >= lo && t <= hi) {
            continue;
        }
        let mut idx = (((t - lo) / width).floor() as usize).min(bins);
        // Rounding can land a sample one bin off near an edge.
        while idx > 0 && t < edges[idx] {
            idx -= 1;
        }
        while idx + 1 < bins && t >= edges[idx + 1] {
            idx += 1;
        }
        sums[idx.min(bins - 1)] += w;
    }
    sums
}

/// Reduce wall collisions to pressure per box: accumulated impulse per bin,
/// divided by the bin width and the box's effective wall perimeter.
pub fn pressure_series(
    collisions: &[WallCollision],
    container: &Container,
    dt: f64,
) -> Result<PressureSeries> {
    profile_scope!("pressure_series");
    if !(dt.is_finite() && dt > 0.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "pressure bin width must be positive, found {}",
            dt
        )));
    }
    let t_max = collisions
        .iter()
        .map(|c| c.time)
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |m| m.max(t))))
        .ok_or_else(|| AnalysisError::Empty("no wall collisions recorded".to_string()))?;

    let edges = bin_edges(t_max, dt);
    let bins = edges.len().saturating_sub(1);

    let reduce = |side: BoxSide| -> Vec<f64> {
        let samples: Vec<(f64, f64)> = collisions
            .iter()
            .filter(|c| c.side == side)
            .map(|c| (c.time, c.impulse()))
            .collect();
        let norm = dt * container.perimeter(side);
        weighted_histogram(&samples, &edges)
            .into_iter()
            .map(|sum| sum / norm)
            .collect()
    };
    let left = reduce(BoxSide::Left);
    let right = reduce(BoxSide::Right);

    Ok(PressureSeries {
        dt,
        times: edges.into_iter().take(bins).collect(),
        left,
        right,
    })
}

/// Time-averaged pressure over the stationary part of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationaryPressure {
    pub left: f64,
    pub right: f64,
    pub left_std: f64,
    pub right_std: f64,
    /// Mean of the two box pressures.
    pub average: f64,
    /// Mean of the two box standard deviations.
    pub average_std: f64,
    /// Number of bins that entered the average.
    pub bins: usize,
}

/// Average every bin whose left edge is at or after `t_stationary`.
pub fn stationary_mean_pressure(series: &PressureSeries, t_stationary: f64) -> Result<StationaryPressure> {
    let select = |values: &[f64]| -> Vec<f64> {
        series
            .times
            .iter()
            .zip(values)
            .filter(|(t, _)| **t >= t_stationary)
            .map(|(_, p)| *p)
            .collect()
    };
    let left = select(&series.left);
    let right = select(&series.right);

    let empty = || {
        AnalysisError::Empty(format!(
            "no pressure bins at or after t = {} (series ends at {})",
            t_stationary,
            series.times.last().copied().unwrap_or(0.0)
        ))
    };
    let left_mean = mean(&left).ok_or_else(empty)?;
    let right_mean = mean(&right).ok_or_else(empty)?;
    let left_std = std_dev(&left).ok_or_else(empty)?;
    let right_std = std_dev(&right).ok_or_else(empty)?;

    Ok(StationaryPressure {
        left: left_mean,
        right: right_mean,
        left_std,
        right_std,
        average: 0.5 * (left_mean + right_mean),
        average_std: 0.5 * (left_std + right_std),
        bins: left.len(),
    })
}
