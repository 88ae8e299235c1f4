// analysis_config.rs
// Loads the optional analysis.toml that overrides the defaults in config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding the `sim_L_*` run folders.
    pub outputs_dir: PathBuf,
    pub files: FilesConfig,
    pub pressure: PressureConfig,
    pub diffusion: DiffusionConfig,
    pub study: StudyConfig,
    /// Per-run overrides, matched on channel width.
    pub runs: Vec<RunOverride>,
    pub plot: PlotConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    pub params: String,
    pub trajectory: String,
    pub collisions: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PressureConfig {
    /// Bin width (s) of the pressure time series.
    pub dt: f64,
    /// Bin width (s) used for the stationary average.
    pub stationary_dt: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiffusionConfig {
    pub bin_size: usize,
    pub t_stationary: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StudyConfig {
    pub channel_widths: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunOverride {
    pub channel_width: f64,
    /// Start of the stationary regime for this run.
    pub t_stationary: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub fps: u32,
    /// Render every `stride`-th frame.
    pub stride: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            outputs_dir: PathBuf::from(config::DEFAULT_OUTPUTS_DIR),
            files: FilesConfig::default(),
            pressure: PressureConfig::default(),
            diffusion: DiffusionConfig::default(),
            study: StudyConfig::default(),
            runs: Vec::new(),
            plot: PlotConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            params: config::PARAMS_FILE.to_string(),
            trajectory: config::TRAJECTORY_FILE.to_string(),
            collisions: config::COLLISIONS_FILE.to_string(),
        }
    }
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            dt: config::PRESSURE_BIN_DT,
            stationary_dt: config::STATIONARY_BIN_DT,
        }
    }
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            bin_size: config::MSD_BIN_SIZE,
            t_stationary: config::T_STATIONARY,
        }
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            channel_widths: config::DEFAULT_CHANNEL_WIDTHS.to_vec(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: config::PLOT_WIDTH,
            height: config::PLOT_HEIGHT,
            font_size: config::PLOT_FONT_SIZE,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: config::ANIMATION_FPS,
            stride: 1,
            width: config::ANIMATION_WIDTH,
            height: config::ANIMATION_HEIGHT,
        }
    }
}

impl AnalysisConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file is absent or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(cfg) => {
                log::info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("Failed to load config from {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Folder holding the files of one run.
    pub fn run_dir(&self, channel_width: f64) -> PathBuf {
        self.outputs_dir.join(config::run_folder_name(channel_width))
    }

    /// Stationary start for a run, honouring any `[[runs]]` override.
    pub fn t_stationary(&self, channel_width: f64) -> f64 {
        self.runs
            .iter()
            .find(|r| same_width(r.channel_width, channel_width))
            .and_then(|r| r.t_stationary)
            .unwrap_or(self.diffusion.t_stationary)
    }
}

/// Widths are compared at the resolution used in folder names.
fn same_width(a: f64, b: f64) -> bool {
    config::run_folder_name(a) == config::run_folder_name(b)
}
