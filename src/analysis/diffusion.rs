// analysis/diffusion.rs
// Mean-squared displacement and the diffusion coefficient estimate

use rayon::prelude::*;
use serde::Serialize;

use super::stats::{linear_fit, mean, std_dev, LinearFit};
use crate::config::DIMENSIONS;
use crate::error::{AnalysisError, Result};
use crate::io::Trajectory;
use crate::profile_scope;

/// `|r_i(t) - r_i(t0)|²` for every frame and particle, anchored on the first
/// frame.
pub fn squared_displacements(trajectory: &Trajectory) -> Result<Vec<Vec<f64>>> {
    let anchor = trajectory
        .frames
        .first()
        .ok_or_else(|| AnalysisError::Empty("trajectory has no frames".to_string()))?;
    if anchor.is_empty() {
        return Err(AnalysisError::Empty("trajectory frames hold no particles".to_string()));
    }

    trajectory
        .frames
        .par_iter()
        .enumerate()
        .map(|(i, frame)| {
            if frame.len() != anchor.len() {
                return Err(AnalysisError::FrameSize {
                    frame: i,
                    expected: anchor.len(),
                    found: frame.len(),
                });
            }
            Ok(frame
                .positions
                .iter()
                .zip(&anchor.positions)
                .map(|(r, r0)| (*r - *r0).mag_sq())
                .collect())
        })
        .collect()
}

/// Particle-averaged squared displacement of every frame.
pub fn frame_msd(trajectory: &Trajectory) -> Result<Vec<f64>> {
    let per_particle = squared_displacements(trajectory)?;
    Ok(per_particle
        .iter()
        .map(|d| mean(d).unwrap_or(0.0))
        .collect())
}

/// MSD averaged over consecutive groups of frames.
#[derive(Debug, Clone, Serialize)]
pub struct MsdSeries {
    pub bin_size: usize,
    /// Mean frame time of each group.
    pub times: Vec<f64>,
    /// Mean of the per-frame MSDs in each group.
    pub msd: Vec<f64>,
    /// Population standard deviation of the per-frame MSDs in each group.
    pub std: Vec<f64>,
}

impl MsdSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Group every `bin_size` frames into one MSD point. The final group may be
/// shorter.
pub fn binned_msd(trajectory: &Trajectory, bin_size: usize) -> Result<MsdSeries> {
    profile_scope!("binned_msd");
    if bin_size == 0 {
        return Err(AnalysisError::InvalidParameter("MSD bin size must be at least 1".to_string()));
    }
    let per_frame = frame_msd(trajectory)?;
    let times = trajectory.times();

    let mut series = MsdSeries {
        bin_size,
        times: Vec::new(),
        msd: Vec::new(),
        std: Vec::new(),
    };
    for (t_chunk, msd_chunk) in times.chunks(bin_size).zip(per_frame.chunks(bin_size)) {
        // Chunks are never empty, so the statistics are always defined.
        series.times.push(mean(t_chunk).unwrap_or(0.0));
        series.msd.push(mean(msd_chunk).unwrap_or(0.0));
        series.std.push(std_dev(msd_chunk).unwrap_or(0.0));
    }
    Ok(series)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiffusionFit {
    /// Diffusion coefficient `D = slope / 4` (m²/s in 2D).
    pub coefficient: f64,
    pub fit: LinearFit,
    /// First and last time inside the fitted window.
    pub t_first: f64,
    pub t_last: f64,
    pub points: usize,
}

/// Fit `MSD(t) = 4 D t + c` over the points with `t_min <= t <= t_max`.
pub fn fit_diffusion(series: &MsdSeries, t_min: Option<f64>, t_max: Option<f64>) -> Result<DiffusionFit> {
    let (x, y): (Vec<f64>, Vec<f64>) = series
        .times
        .iter()
        .zip(&series.msd)
        .filter(|(t, _)| t_min.map_or(true, |lo| **t >= lo) && t_max.map_or(true, |hi| **t <= hi))
        .map(|(t, m)| (*t, *m))
        .unzip();

    if x.len() < 2 {
        return Err(AnalysisError::Empty(format!(
            "{} MSD points inside the fit window [{:?}, {:?}], need at least 2",
            x.len(),
            t_min,
            t_max
        )));
    }
    let fit = linear_fit(&x, &y)?;

    Ok(DiffusionFit {
        coefficient: fit.slope / (2.0 * DIMENSIONS),
        fit,
        t_first: x[0],
        t_last: x[x.len() - 1],
        points: x.len(),
    })
}
