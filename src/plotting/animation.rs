// plotting/animation.rs
// Animated GIF of particle trajectories inside the container outline

use indicatif::{ProgressBar, ProgressStyle};
use palette::{Hsluv, IntoColor, Srgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use super::{plot_err, AnimationStyle, FONT};
use crate::config::ANIMATION_MARGIN;
use crate::error::{AnalysisError, Result};
use crate::geometry::Container;
use crate::io::{Frame, Trajectory};
use crate::profile_scope;

/// Hue (degrees) of the slowest and fastest particles.
const SLOW_HUE: f32 = 250.0;
const FAST_HUE: f32 = 10.0;
const CAPTION_SIZE: u32 = 22;
const FRAME_MARGIN: u32 = 10;

/// Map a speed in `[0, max_speed]` to a colour from blue to red.
pub fn speed_color(speed: f64, max_speed: f64) -> RGBColor {
    let t = if max_speed > 0.0 {
        (speed / max_speed).clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    let hue = SLOW_HUE + (FAST_HUE - SLOW_HUE) * t;
    let rgb: Srgb = Hsluv::new(hue, 90.0, 55.0).into_color();
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Axis ranges around `container` that keep one metre equal on both axes
/// when mapped onto a plotting area of `width` x `height` pixels.
pub fn equal_aspect_ranges(container: &Container, width: u32, height: u32) -> ((f64, f64), (f64, f64)) {
    let x_span = container.total_width() + 2.0 * ANIMATION_MARGIN;
    let y_span = container.box1_height + 2.0 * ANIMATION_MARGIN;
    let canvas = width.max(1) as f64 / height.max(1) as f64;

    let (x_span, y_span) = if x_span / y_span > canvas {
        (x_span, x_span / canvas)
    } else {
        (y_span * canvas, y_span)
    };
    let cx = container.total_width() / 2.0;
    let cy = container.box1_height / 2.0;
    (
        (cx - x_span / 2.0, cx + x_span / 2.0),
        (cy - y_span / 2.0, cy + y_span / 2.0),
    )
}

/// Part of a frame left for the container once the caption and margin are
/// taken; the axis ranges must be derived from its size.
pub(crate) fn frame_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    caption: &str,
) -> Result<DrawingArea<DB, Shift>> {
    let area = root.titled(caption, (FONT, CAPTION_SIZE)).map_err(plot_err)?;
    Ok(area.margin(FRAME_MARGIN, FRAME_MARGIN, FRAME_MARGIN, FRAME_MARGIN))
}

/// Frames drawn for a given stride; the first frame is always included.
pub fn selected_frames(trajectory: &Trajectory, stride: usize) -> impl Iterator<Item = &Frame> {
    trajectory.frames.iter().step_by(stride.max(1))
}

/// Render every `stride`-th frame as one GIF frame: container walls in
/// black, particles as discs of the simulated radius coloured by speed.
pub fn render_animation(
    output_path: &Path,
    trajectory: &Trajectory,
    container: &Container,
    style: &AnimationStyle,
) -> Result<usize> {
    profile_scope!("render_animation");
    if trajectory.is_empty() {
        return Err(AnalysisError::Empty("no frames to animate".to_string()));
    }
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AnalysisError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let max_speed = trajectory
        .frames
        .iter()
        .flat_map(|f| f.velocities.iter())
        .map(|v| v.mag())
        .fold(0.0f64, f64::max);
    let outline: Vec<(f64, f64)> = container.outline().iter().map(|p| (p.x, p.y)).collect();

    let root = BitMapBackend::gif(output_path, (style.width, style.height), style.frame_delay_ms())
        .map_err(plot_err)?
        .into_drawing_area();

    let total = (trajectory.len() + style.stride.max(1) - 1) / style.stride.max(1);
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} frames ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut rendered = 0usize;
    for frame in selected_frames(trajectory, style.stride) {
        root.fill(&WHITE).map_err(plot_err)?;
        let caption = format!("2D gas diffusion (L={:.2}, t={:.1} s)", container.channel_width, frame.time);
        let area = frame_area(&root, &caption)?;
        let (w, h) = area.dim_in_pixel();
        let ((x0, x1), (y0, y1)) = equal_aspect_ranges(container, w, h);
        let mut chart = ChartBuilder::on(&area)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(plot_err)?;

        chart
            .draw_series(LineSeries::new(outline.iter().copied(), BLACK.stroke_width(2)))
            .map_err(plot_err)?;

        let origin = chart.backend_coord(&(0.0, 0.0));
        let edge = chart.backend_coord(&(container.radius, 0.0));
        let radius_px = (edge.0 - origin.0).max(1);

        chart
            .draw_series(frame.positions.iter().zip(&frame.velocities).map(|(p, v)| {
                Circle::new((p.x, p.y), radius_px, speed_color(v.mag(), max_speed).filled())
            }))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        rendered += 1;
        progress.inc(1);
    }
    progress.finish_and_clear();

    log::info!("Saved {} animation frames to {}", rendered, output_path.display());
    Ok(rendered)
}
