// profiler.rs
// Wall-clock time spent in each analysis stage (loading, binning, rendering)

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulated time and call count of one named stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTiming {
    pub name: &'static str,
    pub total: Duration,
    pub calls: u32,
}

#[derive(Default)]
pub struct Profiler {
    stages: HashMap<&'static str, (Duration, u32)>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let entry = self.stages.entry(name).or_default();
        entry.0 += elapsed;
        entry.1 += 1;
    }

    pub fn finish(&mut self, guard: &ProfilerGuard) {
        self.record(guard.name, guard.start.elapsed());
    }

    /// Stages ordered by total time, slowest first; ties by name.
    pub fn report(&self) -> Vec<StageTiming> {
        let mut rows: Vec<StageTiming> = self
            .stages
            .iter()
            .map(|(name, (total, calls))| StageTiming {
                name: *name,
                total: *total,
                calls: *calls,
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total).then(a.name.cmp(b.name)));
        rows
    }

    /// Report and reset, so a second command in the same process starts clean.
    pub fn take_report(&mut self) -> Vec<StageTiming> {
        let rows = self.report();
        self.stages.clear();
        rows
    }
}

/// Open timing scope; folded into the global profiler on drop when the
/// `profiling` feature is on.
pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard { name, start: Instant::now() }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().finish(self);
    }
}

/// Time the rest of the enclosing scope under `$name`.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}
