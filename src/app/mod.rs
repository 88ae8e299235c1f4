//! Command-line front end: argument parsing, logging setup and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::analysis_config::{AnalysisConfig, RunOverride};
use crate::config;

pub mod commands;

#[derive(Parser)]
#[command(name = "gas-analysis")]
#[command(about = "Post-processing of 2D hard-sphere gas runs", version)]
pub struct Cli {
    /// Path to the TOML analysis config
    #[arg(short, long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory holding the sim_L_* run folders
    #[arg(short, long, global = true)]
    outputs_dir: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wall pressure over time for both boxes of one run
    Pressure {
        /// Channel width L of the run [m]
        #[arg(short, long)]
        width: f64,
        /// Time bin width [s]
        #[arg(long)]
        dt: Option<f64>,
    },

    /// Mean squared displacement and diffusion coefficient of one run
    Diffusion {
        /// Channel width L of the run [m]
        #[arg(short, long)]
        width: f64,
        /// Frames averaged per MSD point
        #[arg(long)]
        bin_size: Option<usize>,
        /// Start of the stationary regime [s]
        #[arg(long)]
        t_stationary: Option<f64>,
    },

    /// Stationary pressure against accessible area over several runs
    PressureArea {
        /// Channel widths to include [m]
        #[arg(long, value_delimiter = ',')]
        widths: Option<Vec<f64>>,
    },

    /// Animated GIF of the particle trajectories of one run
    Animate {
        /// Channel width L of the run [m]
        #[arg(short, long)]
        width: f64,
        /// Frames per second
        #[arg(long)]
        fps: Option<u32>,
        /// Render every k-th frame
        #[arg(long)]
        stride: Option<usize>,
    },
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<60} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 37 {
            format!("{}...", value.chars().take(34).collect::<String>())
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<37} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

impl Cli {
    /// Fold the command-line overrides into `cfg`.
    fn apply_overrides(&self, cfg: &mut AnalysisConfig) {
        if let Some(dir) = &self.outputs_dir {
            cfg.outputs_dir = dir.clone();
        }
        match &self.command {
            Commands::Pressure { dt, .. } => {
                if let Some(dt) = dt {
                    cfg.pressure.dt = *dt;
                }
            }
            Commands::Diffusion { width, bin_size, t_stationary } => {
                if let Some(n) = bin_size {
                    cfg.diffusion.bin_size = *n;
                }
                if let Some(t) = t_stationary {
                    // Takes precedence over any [[runs]] entry for the same width.
                    cfg.runs.insert(
                        0,
                        RunOverride {
                            channel_width: *width,
                            t_stationary: Some(*t),
                        },
                    );
                }
            }
            Commands::PressureArea { widths } => {
                if let Some(widths) = widths {
                    cfg.study.channel_widths = widths.clone();
                }
            }
            Commands::Animate { fps, stride, .. } => {
                if let Some(fps) = fps {
                    cfg.animation.fps = *fps;
                }
                if let Some(stride) = stride {
                    cfg.animation.stride = *stride;
                }
            }
        }
    }

    fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

/// Parse arguments, run the chosen command and return the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp_secs()
        .init();

    let mut cfg = AnalysisConfig::load_or_default(&cli.config);
    cli.apply_overrides(&mut cfg);

    let result = match &cli.command {
        Commands::Pressure { width, .. } => commands::pressure(&cfg, *width),
        Commands::Diffusion { width, .. } => commands::diffusion(&cfg, *width, cfg.t_stationary(*width)),
        Commands::PressureArea { .. } => commands::pressure_area(&cfg),
        Commands::Animate { width, .. } => commands::animate(&cfg, *width),
    };

    #[cfg(feature = "profiling")]
    {
        let rows: Vec<(&str, String)> = crate::PROFILER
            .lock()
            .take_report()
            .into_iter()
            .map(|stage| (stage.name, format!("{:.2?} in {} calls", stage.total, stage.calls)))
            .collect();
        print_summary("Timings", &rows);
    }

    match result {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gas-analysis").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn widths_are_comma_separated_and_keep_their_order() {
        let cli = parse(&["pressure-area", "--widths", "0.07,0.03"]);
        let mut cfg = AnalysisConfig::default();
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.study.channel_widths, vec![0.07, 0.03]);

        let cli = parse(&["pressure-area"]);
        let mut cfg = AnalysisConfig::default();
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.study.channel_widths, config::DEFAULT_CHANNEL_WIDTHS.to_vec());
    }

    #[test]
    fn diffusion_flags_override_config() {
        let cli = parse(&["-v", "-v", "--outputs-dir", "runs", "diffusion", "-w", "0.05", "--bin-size", "5"]);
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
        assert_eq!(cli.config, Path::new(config::DEFAULT_CONFIG_FILE));

        let mut cfg = AnalysisConfig::default();
        cfg.pressure.dt = 4.0;
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.outputs_dir, PathBuf::from("runs"));
        assert_eq!(cfg.diffusion.bin_size, 5);
        assert_eq!(cfg.pressure.dt, 4.0);
        assert_eq!(cfg.t_stationary(0.05), config::T_STATIONARY);
    }

    #[test]
    fn stationary_flag_beats_run_override() {
        let cli = parse(&["diffusion", "--width", "0.05", "--t-stationary", "50"]);
        let mut cfg = AnalysisConfig::default();
        cfg.runs.push(RunOverride {
            channel_width: 0.05,
            t_stationary: Some(120.0),
        });
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.t_stationary(0.05), 50.0);
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = parse(&["animate", "-w", "0.03", "--stride", "4", "--fps", "12", "--config", "study.toml", "-v"]);
        assert_eq!(cli.config, Path::new("study.toml"));
        assert_eq!(cli.log_level(), log::LevelFilter::Info);
        let mut cfg = AnalysisConfig::default();
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.animation.stride, 4);
        assert_eq!(cfg.animation.fps, 12);
    }

    #[test]
    fn pressure_dt_override_and_missing_width() {
        let cli = parse(&["pressure", "-w", "0.09", "--dt", "0.5"]);
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
        let mut cfg = AnalysisConfig::default();
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.pressure.dt, 0.5);

        assert!(Cli::try_parse_from(["gas-analysis", "pressure"]).is_err());
        assert!(Cli::try_parse_from(["gas-analysis", "diffusion", "-w", "wide"]).is_err());
    }
}
