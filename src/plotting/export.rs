// plotting/export.rs
// CSV and JSON export of the computed series and study tables

use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::analysis::{MsdSeries, PressureAreaStudy, PressureSeries};
use crate::error::{AnalysisError, Result};

fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| AnalysisError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

fn write_rows<I>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    ensure_parent_dirs(path)?;
    let csv_err = |e: csv::Error| AnalysisError::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(header).map_err(csv_err)?;
    for row in rows {
        writer.write_record(&row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| AnalysisError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Saved table to {}", path.display());
    Ok(())
}

/// `L, A, P_avg, P·A` per run, three decimals.
pub fn export_pa_table(path: &Path, study: &PressureAreaStudy) -> Result<()> {
    write_rows(
        path,
        &["L [m]", "A_total [m²]", "P_avg [Pa]", "P·A [Pa·m²]"],
        study.points.iter().map(|p| {
            vec![
                format!("{:.3}", p.channel_width),
                format!("{:.3}", p.area),
                format!("{:.3}", p.pressure.average),
                format!("{:.3}", p.pressure_area()),
            ]
        }),
    )
}

pub fn export_pressure_csv(path: &Path, series: &PressureSeries) -> Result<()> {
    write_rows(
        path,
        &["time [s]", "P_left [Pa]", "P_right [Pa]"],
        series
            .times
            .iter()
            .zip(series.left.iter().zip(&series.right))
            .map(|(t, (l, r))| vec![t.to_string(), l.to_string(), r.to_string()]),
    )
}

pub fn export_msd_csv(path: &Path, series: &MsdSeries) -> Result<()> {
    write_rows(
        path,
        &["time [s]", "msd [m²]", "std [m²]"],
        series
            .times
            .iter()
            .zip(series.msd.iter().zip(&series.std))
            .map(|(t, (m, s))| vec![t.to_string(), m.to_string(), s.to_string()]),
    )
}

#[derive(Serialize)]
struct StudyRow {
    channel_width: f64,
    area: f64,
    pressure_left: f64,
    pressure_right: f64,
    pressure_avg: f64,
    pressure_avg_std: f64,
    pressure_area: f64,
}

#[derive(Serialize)]
struct StudySummary<'a> {
    runs: Vec<StudyRow>,
    inverse_area_fit: &'a Option<crate::analysis::LinearFit>,
}

/// Full study, including per-box pressures and the inverse-area fit, as
/// pretty JSON.
pub fn export_study_json(path: &Path, study: &PressureAreaStudy) -> Result<()> {
    ensure_parent_dirs(path)?;
    let summary = StudySummary {
        runs: study
            .points
            .iter()
            .map(|p| StudyRow {
                channel_width: p.channel_width,
                area: p.area,
                pressure_left: p.pressure.left,
                pressure_right: p.pressure.right,
                pressure_avg: p.pressure.average,
                pressure_avg_std: p.pressure.average_std,
                pressure_area: p.pressure_area(),
            })
            .collect(),
        inverse_area_fit: &study.inverse_area_fit,
    };
    let file = File::create(path).map_err(|e| AnalysisError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &summary)?;
    log::info!("Saved study summary to {}", path.display());
    Ok(())
}
