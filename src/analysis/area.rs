// analysis/area.rs
// Stationary pressure against container area across several runs

use rayon::prelude::*;
use serde::Serialize;

use super::pressure::{pressure_series, stationary_mean_pressure, StationaryPressure};
use super::stats::{linear_fit, LinearFit};
use crate::analysis_config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::geometry::Container;
use crate::io::{load_collisions, load_params, SimParams, WallCollision};
use crate::profile_scope;

/// One run of the study: its geometry and stationary pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaPoint {
    pub channel_width: f64,
    /// Area accessible to particle centres (m²).
    pub area: f64,
    pub pressure: StationaryPressure,
}

impl AreaPoint {
    /// `P·A`, constant for an ideal gas at fixed temperature.
    pub fn pressure_area(&self) -> f64 {
        self.pressure.average * self.area
    }

    pub fn inverse_area(&self) -> f64 {
        1.0 / self.area
    }
}

/// Reduce one run's collisions to its point on the P(A) curve.
pub fn area_point(
    params: &SimParams,
    collisions: &[WallCollision],
    stationary_dt: f64,
    t_stationary: f64,
) -> Result<AreaPoint> {
    let container = Container::from(params);
    let series = pressure_series(collisions, &container, stationary_dt)?;
    let pressure = stationary_mean_pressure(&series, t_stationary)?;
    Ok(AreaPoint {
        channel_width: params.channel_width,
        area: container.accessible_area(),
        pressure,
    })
}

/// Least-squares line `P = k / A + b`; `slope` is `k`.
pub fn fit_inverse_area(points: &[AreaPoint]) -> Result<LinearFit> {
    let x: Vec<f64> = points.iter().map(AreaPoint::inverse_area).collect();
    let y: Vec<f64> = points.iter().map(|p| p.pressure.average).collect();
    linear_fit(&x, &y)
}

#[derive(Debug, Clone, Serialize)]
pub struct PressureAreaStudy {
    pub points: Vec<AreaPoint>,
    /// Absent when fewer than two runs were analysed.
    pub inverse_area_fit: Option<LinearFit>,
}

/// Load every run of the study and reduce them in parallel. Points come
/// back in the order of `channel_widths`.
pub fn run_study(config: &AnalysisConfig, channel_widths: &[f64]) -> Result<PressureAreaStudy> {
    profile_scope!("pressure_area_study");
    if channel_widths.is_empty() {
        return Err(AnalysisError::Empty("no channel widths to analyse".to_string()));
    }

    let points = channel_widths
        .par_iter()
        .map(|&width| {
            let dir = config.run_dir(width);
            let params = load_params(dir.join(&config.files.params))?;
            let collisions = load_collisions(dir.join(&config.files.collisions))?;
            let point = area_point(
                &params,
                &collisions,
                config.pressure.stationary_dt,
                config.t_stationary(width),
            )?;
            log::info!(
                "L={:.2} -> A={:.4}, P_avg={:.4}",
                width,
                point.area,
                point.pressure.average
            );
            Ok(point)
        })
        .collect::<Result<Vec<AreaPoint>>>()?;

    let inverse_area_fit = if points.len() >= 2 {
        Some(fit_inverse_area(&points)?)
    } else {
        log::warn!("Only one run in the study, skipping the inverse-area fit");
        None
    };

    Ok(PressureAreaStudy {
        points,
        inverse_area_fit,
    })
}
