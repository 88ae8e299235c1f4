// plotting/mod.rs
// Static charts, trajectory animation and tabular export of the analysis results

use crate::analysis_config::{AnimationConfig, PlotConfig};
use crate::error::AnalysisError;

pub mod animation;
pub mod charts;
pub mod export;

#[cfg(test)]
mod tests;

pub use animation::render_animation;
pub use charts::{plot_inverse_area_fit, plot_msd, plot_pressure_vs_area, plot_pressure_vs_time, AreaAxis};
pub use export::{export_msd_csv, export_pa_table, export_pressure_csv, export_study_json};

pub(crate) const FONT: &str = "sans-serif";

/// Canvas size and text size shared by every static chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

impl From<&PlotConfig> for ChartStyle {
    fn from(cfg: &PlotConfig) -> Self {
        Self {
            width: cfg.width,
            height: cfg.height,
            font_size: cfg.font_size,
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&PlotConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnimationStyle {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub stride: usize,
}

impl From<&AnimationConfig> for AnimationStyle {
    fn from(cfg: &AnimationConfig) -> Self {
        Self {
            width: cfg.width,
            height: cfg.height,
            fps: cfg.fps,
            stride: cfg.stride,
        }
    }
}

impl AnimationStyle {
    /// GIF frame delay in milliseconds.
    pub fn frame_delay_ms(&self) -> u32 {
        (1000 / self.fps.max(1)).max(1)
    }
}

pub(crate) fn plot_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Plotting(e.to_string())
}

/// Min/max over all finite values, padded by `pad` of the span. A flat or
/// empty range is widened so the axis stays drawable.
pub(crate) fn padded_range<'a, I>(values: I, pad: f64) -> (f64, f64)
where
    I: IntoIterator<Item = &'a f64>,
{
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        let widen = if lo.abs() > 0.0 { lo.abs() * 0.1 } else { 1.0 };
        lo -= widen;
        hi += widen;
    }
    let span = hi - lo;
    (lo - span * pad, hi + span * pad)
}
