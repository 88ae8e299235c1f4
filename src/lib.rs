pub mod analysis;
pub mod analysis_config;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod plotting;
pub mod profiler;

pub mod app;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
