// plotting/charts.rs
// PNG charts for pressure, MSD and the pressure-area study

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::Path;

use super::{padded_range, plot_err, ChartStyle, FONT};
use crate::analysis::{AreaPoint, DiffusionFit, LinearFit, MsdSeries, PressureSeries};
use crate::error::{AnalysisError, Result};
use crate::io::BoxSide;
use crate::profile_scope;

const LEFT_COLOR: RGBColor = RGBColor(55, 126, 184);
const RIGHT_COLOR: RGBColor = RGBColor(228, 26, 28);
const FIT_COLOR: RGBColor = RGBColor(255, 127, 0);

fn side_color(side: BoxSide) -> RGBColor {
    match side {
        BoxSide::Left => LEFT_COLOR,
        BoxSide::Right => RIGHT_COLOR,
    }
}

/// Pressure of both boxes against time.
pub fn plot_pressure_vs_time(output_path: &Path, series: &PressureSeries, style: &ChartStyle) -> Result<()> {
    profile_scope!("plot_pressure_vs_time");
    if series.is_empty() {
        return Err(AnalysisError::Empty("pressure series has no bins".to_string()));
    }
    let (x0, x1) = padded_range(series.times.iter(), 0.02);
    let (_, y1) = padded_range(series.left.iter().chain(series.right.iter()), 0.05);

    let root = BitMapBackend::new(output_path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(x0..x1, 0.0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time [s]")
        .y_desc("Pressure [Pa]")
        .label_style((FONT, style.font_size))
        .axis_desc_style((FONT, style.font_size))
        .draw()
        .map_err(plot_err)?;

    for side in BoxSide::ALL {
        let color = side_color(side);
        chart
            .draw_series(LineSeries::new(
                series.times.iter().copied().zip(series.side(side).iter().copied()),
                color.stroke_width(2),
            ))
            .map_err(plot_err)?
            .label(side.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .label_font((FONT, style.font_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Saved plot to {}", output_path.display());
    Ok(())
}

/// Binned MSD with ±std error bars, the stationary fit and a marker at the
/// start of the stationary regime.
pub fn plot_msd(
    output_path: &Path,
    series: &MsdSeries,
    fit: &DiffusionFit,
    t_stationary: f64,
    style: &ChartStyle,
) -> Result<()> {
    profile_scope!("plot_msd");
    if series.is_empty() {
        return Err(AnalysisError::Empty("MSD series has no points".to_string()));
    }
    let (x0, x1) = padded_range(series.times.iter().chain(std::iter::once(&t_stationary)), 0.03);
    let upper: Vec<f64> = series.msd.iter().zip(&series.std).map(|(m, s)| m + s).collect();
    let lower: Vec<f64> = series.msd.iter().zip(&series.std).map(|(m, s)| m - s).collect();
    let (y0, y1) = padded_range(upper.iter().chain(lower.iter()), 0.05);

    let root = BitMapBackend::new(output_path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(120)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time [s]")
        .y_desc("<z²> [m²]")
        .y_label_formatter(&|v| format!("{:.1e}", v))
        .label_style((FONT, style.font_size))
        .axis_desc_style((FONT, style.font_size))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(series.times.iter().zip(series.msd.iter().zip(&series.std)).map(|(t, (m, s))| {
            ErrorBar::new_vertical(*t, m - s, *m, m + s, LEFT_COLOR.filled(), 10)
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(LineSeries::new(
            series.times.iter().copied().zip(series.msd.iter().copied()),
            LEFT_COLOR.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label(format!("Data (bin = {})", series.bin_size))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LEFT_COLOR.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            [fit.t_first, fit.t_last].into_iter().map(|t| (t, fit.fit.eval(t))),
            FIT_COLOR.stroke_width(3),
        ))
        .map_err(plot_err)?
        .label(format!("Linear fit (D = {:.3e})", fit.coefficient))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOR.stroke_width(3)));

    chart
        .draw_series(DashedLineSeries::new(
            vec![(t_stationary, y0), (t_stationary, y1)],
            10,
            6,
            BLACK.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label("Start of stationary regime")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, style.font_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Saved plot to {}", output_path.display());
    Ok(())
}

/// Horizontal axis of the pressure-area chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaAxis {
    Area,
    InverseArea,
}

impl AreaAxis {
    fn value(&self, point: &AreaPoint) -> f64 {
        match self {
            AreaAxis::Area => point.area,
            AreaAxis::InverseArea => point.inverse_area(),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            AreaAxis::Area => "Total area A [m²]",
            AreaAxis::InverseArea => "Inverse total area 1/A [1/m²]",
        }
    }
}

/// `(x, P_avg)` pairs in increasing x, whatever order the runs came in.
pub(crate) fn connecting_line(points: &[AreaPoint], axis: AreaAxis) -> Vec<(f64, f64)> {
    let mut line: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (axis.value(p), p.pressure.average))
        .collect();
    line.sort_by(|a, b| a.0.total_cmp(&b.0));
    line
}

/// Stationary mean pressure with error bars against area or inverse area,
/// each point annotated with its area and channel width.
pub fn plot_pressure_vs_area(
    output_path: &Path,
    points: &[AreaPoint],
    axis: AreaAxis,
    style: &ChartStyle,
) -> Result<()> {
    profile_scope!("plot_pressure_vs_area");
    if points.is_empty() {
        return Err(AnalysisError::Empty("no study points to plot".to_string()));
    }
    let xs: Vec<f64> = points.iter().map(|p| axis.value(p)).collect();
    let (x0, x1) = padded_range(xs.iter(), 0.1);
    let bounds: Vec<f64> = points
        .iter()
        .flat_map(|p| [p.pressure.average + p.pressure.average_std, 0.0])
        .collect();
    let (_, y1) = padded_range(bounds.iter(), 0.15);

    let root = BitMapBackend::new(output_path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(x0..x1, 0.0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(axis.description())
        .y_desc("Mean pressure [Pa]")
        .label_style((FONT, style.font_size))
        .axis_desc_style((FONT, style.font_size))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(connecting_line(points, axis), LEFT_COLOR.stroke_width(2)))
        .map_err(plot_err)?;
    chart
        .draw_series(xs.iter().zip(points).map(|(x, p)| {
            let avg = p.pressure.average;
            let std = p.pressure.average_std;
            ErrorBar::new_vertical(*x, avg - std, avg, avg + std, LEFT_COLOR.filled(), 10)
        }))
        .map_err(plot_err)?
        .label("Mean pressure")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, LEFT_COLOR.filled()));

    let text_style = (FONT, style.font_size.saturating_sub(4).max(8)).into_font().color(&BLACK);
    chart
        .draw_series(xs.iter().zip(points).map(|(x, p)| {
            Text::new(
                format!("{:.3} (L={:.2})", axis.value(p), p.channel_width),
                (*x, p.pressure.average),
                text_style.clone(),
            )
        }))
        .map_err(plot_err)?;

    chart
        .configure_series_labels()
        .label_font((FONT, style.font_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Saved plot to {}", output_path.display());
    Ok(())
}

/// Mean pressure against inverse area together with the fitted line
/// `P = k / A + b`.
pub fn plot_inverse_area_fit(
    output_path: &Path,
    points: &[AreaPoint],
    fit: &LinearFit,
    style: &ChartStyle,
) -> Result<()> {
    profile_scope!("plot_inverse_area_fit");
    if points.is_empty() {
        return Err(AnalysisError::Empty("no study points to plot".to_string()));
    }
    let xs: Vec<f64> = points.iter().map(AreaPoint::inverse_area).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.pressure.average).collect();
    let (x0, x1) = padded_range(xs.iter(), 0.1);
    let fitted: Vec<f64> = [x0, x1].iter().map(|x| fit.eval(*x)).collect();
    let (y0, y1) = padded_range(ys.iter().chain(fitted.iter()), 0.1);

    let root = BitMapBackend::new(output_path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("1 / A [1/m²]")
        .y_desc("P [Pa]")
        .label_style((FONT, style.font_size))
        .axis_desc_style((FONT, style.font_size))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(xs.iter().zip(&ys).map(|(x, y)| Circle::new((*x, *y), 6, LEFT_COLOR.filled())))
        .map_err(plot_err)?
        .label("Mean pressure")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, LEFT_COLOR.filled()));
    chart
        .draw_series(LineSeries::new(
            [x0, x1].into_iter().map(|x| (x, fit.eval(x))),
            FIT_COLOR.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label(format!("P = {:.4e}/A + {:.4} (R² = {:.4})", fit.slope, fit.intercept, fit.r_squared))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOR.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, style.font_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Saved plot to {}", output_path.display());
    Ok(())
}
