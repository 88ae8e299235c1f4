//! Reductions from raw simulator output to physical observables.
//!
//! - `pressure`: wall pressure per box over time, and its stationary mean
//! - `diffusion`: binned mean-squared displacement and `D` from a line fit
//! - `area`: stationary pressure against accessible area over several runs

pub mod area;
pub mod diffusion;
pub mod pressure;
pub mod stats;


pub use area::{area_point, fit_inverse_area, run_study, AreaPoint, PressureAreaStudy};
pub use diffusion::{binned_msd, fit_diffusion, DiffusionFit, MsdSeries};
pub use pressure::{pressure_series, stationary_mean_pressure, PressureSeries, StationaryPressure};
pub use stats::LinearFit;
