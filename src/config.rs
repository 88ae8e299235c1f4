// Centralized defaults for the analysis pipeline

// ====================
// Run layout
// ====================
/// Directory holding one `sim_L_<width>` folder per simulation run.
pub const DEFAULT_OUTPUTS_DIR: &str = "outputs";
pub const PARAMS_FILE: &str = "params.txt";
pub const TRAJECTORY_FILE: &str = "output.txt";
pub const COLLISIONS_FILE: &str = "bounce_wall_output.txt";
/// Default location of the TOML configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "analysis.toml";

// ====================
// Pressure
// ====================
/// Bin width (s) of the pressure-vs-time series.
pub const PRESSURE_BIN_DT: f64 = 2.0;
/// Bin width (s) used when averaging pressure over the stationary regime.
pub const STATIONARY_BIN_DT: f64 = 10.0;

// ====================
// Diffusion
// ====================
/// Number of consecutive frames averaged into one MSD point.
pub const MSD_BIN_SIZE: usize = 10_000;
/// Time (s) after which a run is considered stationary.
pub const T_STATIONARY: f64 = 200.0;
/// Spatial dimensions; MSD(t) = 2 * DIMENSIONS * D * t.
pub const DIMENSIONS: f64 = 2.0;

// ====================
// Study
// ====================
pub const DEFAULT_CHANNEL_WIDTHS: [f64; 4] = [0.03, 0.05, 0.07, 0.09];

// ====================
// Rendering
// ====================
pub const PLOT_WIDTH: u32 = 1600;
pub const PLOT_HEIGHT: u32 = 1000;
pub const PLOT_FONT_SIZE: u32 = 24;
pub const ANIMATION_FPS: u32 = 30;
pub const ANIMATION_WIDTH: u32 = 1000;
pub const ANIMATION_HEIGHT: u32 = 600;
/// Margin (m) drawn around the container in the animation.
pub const ANIMATION_MARGIN: f64 = 0.01;

/// Name of the folder holding the files of the run with the given channel width.
pub fn run_folder_name(channel_width: f64) -> String {
    format!("sim_L_{:.2}", channel_width)
}
