//! Bodies of the subcommands. Each loads its inputs from the run folder,
//! runs the reduction and writes plots and tables.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

use super::print_summary;
use crate::analysis::{
    binned_msd, fit_diffusion, pressure_series, stationary_mean_pressure, PressureAreaStudy,
};
use crate::analysis_config::AnalysisConfig;
use crate::geometry::Container;
use crate::io::{load_collisions, load_params, load_trajectory, SimParams};
use crate::plotting::{self, AnimationStyle, AreaAxis, ChartStyle};

fn load_run_params(cfg: &AnalysisConfig, width: f64) -> Result<SimParams> {
    let path = cfg.run_dir(width).join(&cfg.files.params);
    load_params(&path).with_context(|| format!("loading parameters of run L={:.2}", width))
}

pub fn pressure(cfg: &AnalysisConfig, width: f64) -> Result<()> {
    let start = Instant::now();
    let run_dir = cfg.run_dir(width);
    let params = load_run_params(cfg, width)?;
    let collisions = load_collisions(run_dir.join(&cfg.files.collisions))
        .with_context(|| format!("loading wall collisions of run L={:.2}", width))?;
    let container = Container::from(&params);

    let series = pressure_series(&collisions, &container, cfg.pressure.dt)?;
    let style = ChartStyle::from(&cfg.plot);
    plotting::plot_pressure_vs_time(&run_dir.join("pressure_vs_time.png"), &series, &style)?;
    plotting::export_pressure_csv(&run_dir.join("pressure_vs_time.csv"), &series)?;

    let mut items = vec![
        ("Run", run_dir.display().to_string()),
        ("Collisions", collisions.len().to_string()),
        ("Bins", format!("{} x {} s", series.len(), series.dt)),
    ];
    let t_stat = cfg.t_stationary(width);
    let coarse = pressure_series(&collisions, &container, cfg.pressure.stationary_dt)?;
    match stationary_mean_pressure(&coarse, t_stat) {
        Ok(p) => {
            items.push(("P left [Pa]", format!("{:.4} ± {:.4}", p.left, p.left_std)));
            items.push(("P right [Pa]", format!("{:.4} ± {:.4}", p.right, p.right_std)));
        }
        Err(e) => log::warn!("No stationary average after t={} s: {}", t_stat, e),
    }
    items.push(("Elapsed", format!("{:.2?}", start.elapsed())));
    print_summary("Wall pressure", &items);
    Ok(())
}

pub fn diffusion(cfg: &AnalysisConfig, width: f64, t_stationary: f64) -> Result<()> {
    let start = Instant::now();
    let run_dir = cfg.run_dir(width);
    let params = load_run_params(cfg, width)?;
    let trajectory = load_trajectory(run_dir.join(&cfg.files.trajectory), Some(params.particle_count))
        .with_context(|| format!("loading trajectory of run L={:.2}", width))?;
    log::info!(
        "Loaded {} frames of {} particles",
        trajectory.len(),
        trajectory.particle_count()
    );

    let series = binned_msd(&trajectory, cfg.diffusion.bin_size)?;
    let fit = fit_diffusion(&series, Some(t_stationary), None)
        .with_context(|| format!("fitting MSD for t >= {} s", t_stationary))?;

    let style = ChartStyle::from(&cfg.plot);
    plotting::plot_msd(&cfg.outputs_dir.join("msd.png"), &series, &fit, t_stationary, &style)?;
    plotting::export_msd_csv(&cfg.outputs_dir.join("msd.csv"), &series)?;

    print_summary(
        "Diffusion",
        &[
            ("Run", run_dir.display().to_string()),
            ("Frames", trajectory.len().to_string()),
            ("MSD points", series.len().to_string()),
            ("Fit window [s]", format!("{:.1} .. {:.1} ({} pts)", fit.t_first, fit.t_last, fit.points)),
            ("D [m²/s]", format!("{:.4e}", fit.coefficient)),
            ("r²", format!("{:.4}", fit.fit.r_squared)),
            ("Elapsed", format!("{:.2?}", start.elapsed())),
        ],
    );
    Ok(())
}

pub fn pressure_area(cfg: &AnalysisConfig) -> Result<()> {
    let start = Instant::now();
    let study = crate::analysis::run_study(cfg, &cfg.study.channel_widths)
        .context("running the pressure-area study")?;
    write_study(&cfg.outputs_dir, &study, &ChartStyle::from(&cfg.plot))?;

    let mut items: Vec<(&str, String)> = study
        .points
        .iter()
        .map(|p| {
            (
                "L [m]",
                format!("{:.2}: A={:.4} P={:.4}", p.channel_width, p.area, p.pressure.average),
            )
        })
        .collect();
    if let Some(fit) = &study.inverse_area_fit {
        items.push(("Fit P = k/A + b", format!("k={:.4e} b={:.4e}", fit.slope, fit.intercept)));
    }
    items.push(("Elapsed", format!("{:.2?}", start.elapsed())));
    print_summary("Pressure vs area", &items);
    Ok(())
}

fn write_study(outputs_dir: &Path, study: &PressureAreaStudy, style: &ChartStyle) -> Result<()> {
    plotting::plot_pressure_vs_area(
        &outputs_dir.join("pressure_vs_area.png"),
        &study.points,
        AreaAxis::Area,
        style,
    )?;
    plotting::plot_pressure_vs_area(
        &outputs_dir.join("pressure_vs_inverse_area.png"),
        &study.points,
        AreaAxis::InverseArea,
        style,
    )?;
    if let Some(fit) = &study.inverse_area_fit {
        plotting::plot_inverse_area_fit(&outputs_dir.join("inverse_area_fit.png"), &study.points, fit, style)?;
    }
    plotting::export_pa_table(&outputs_dir.join("pa_table.csv"), study)?;
    plotting::export_study_json(&outputs_dir.join("pressure_area_summary.json"), study)?;
    Ok(())
}

pub fn animate(cfg: &AnalysisConfig, width: f64) -> Result<()> {
    let start = Instant::now();
    let run_dir = cfg.run_dir(width);
    let params = load_run_params(cfg, width)?;
    let trajectory = load_trajectory(run_dir.join(&cfg.files.trajectory), Some(params.particle_count))
        .with_context(|| format!("loading trajectory of run L={:.2}", width))?;

    let output = run_dir.join("animation.gif");
    let style = AnimationStyle::from(&cfg.animation);
    let frames = plotting::render_animation(&output, &trajectory, &Container::from(&params), &style)
        .with_context(|| format!("rendering {}", output.display()))?;

    print_summary(
        "Animation",
        &[
            ("Output", output.display().to_string()),
            ("Frames", format!("{} of {}", frames, trajectory.len())),
            ("FPS", style.fps.to_string()),
            ("Elapsed", format!("{:.2?}", start.elapsed())),
        ],
    );
    Ok(())
}
