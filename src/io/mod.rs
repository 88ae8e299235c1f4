//! Loaders for the flat files written by the hard-sphere simulator.
//!
//! Every run folder holds three text files:
//! - `params.txt`: container geometry and particle count
//! - `output.txt`: particle positions and velocities per output frame
//! - `bounce_wall_output.txt`: one record per wall collision
//!
//! Any of them may be gzip-compressed, either in place or with a `.gz`
//! suffix; the loaders decompress transparently.

pub mod collisions;
pub mod params;
pub mod trajectory;

#[cfg(test)]
mod tests;

pub use collisions::{load_collisions, BoxSide, WallCollision, WallKind};
pub use params::{load_params, SimParams};
pub use trajectory::{load_trajectory, Frame, Trajectory};

use flate2::read::GzDecoder;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, Result};

/// Resolve an input path, accepting a gzip sibling (`<name>.gz`).
pub fn resolve_input(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    let mut gz = path.as_os_str().to_os_string();
    gz.push(".gz");
    let gz = PathBuf::from(gz);
    if gz.exists() {
        return Ok(gz);
    }
    Err(AnalysisError::MissingFile(path.to_path_buf()))
}

/// Read a whole input file as text, decompressing gzip content.
pub fn read_text(path: &Path) -> Result<(PathBuf, String)> {
    let resolved = resolve_input(path)?;
    let data = std::fs::read(&resolved).map_err(|e| AnalysisError::Read {
        path: resolved.clone(),
        source: e,
    })?;
    let bytes = match maybe_decompress_gzip(&data) {
        Ok(Some(decoded)) => decoded,
        Ok(None) => data,
        Err(e) => {
            return Err(AnalysisError::Read {
                path: resolved,
                source: e,
            })
        }
    };
    let text = String::from_utf8(bytes).map_err(|e| {
        AnalysisError::parse(&resolved, 0, format!("file is not valid UTF-8: {}", e))
    })?;
    Ok((resolved, text))
}

fn maybe_decompress_gzip(data: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
    if data.len() < 2 || data[0] != 0x1f || data[1] != 0x8b {
        return Ok(None);
    }

    let mut decoder = GzDecoder::new(Cursor::new(data));
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(Some(decoded))
}

/// Data lines of a simulator text file: 1-based line number and trimmed
/// content, skipping blanks and `#` comments.
pub(crate) fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

pub(crate) fn parse_f64(path: &Path, line: usize, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| AnalysisError::parse(path, line, format!("invalid number '{}'", token)))
}
