use serde::{Deserialize, Serialize};
use std::path::Path;
use ultraviolet::DVec2;

use super::{data_lines, parse_f64, read_text};
use crate::error::{AnalysisError, Result};
use crate::profile_scope;

/// Which of the two connected boxes a collision happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxSide {
    Left,
    Right,
}

impl BoxSide {
    pub const ALL: [BoxSide; 2] = [BoxSide::Left, BoxSide::Right];

    /// Map the simulator's box id (1 = left, 2 = right).
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(BoxSide::Left),
            2 => Some(BoxSide::Right),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoxSide::Left => "Left box",
            BoxSide::Right => "Right box",
        }
    }
}

/// Kind of wall hit, as written in the last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallKind {
    /// `V`: only the x component is reversed.
    Vertical,
    /// `H`: only the y component is reversed.
    Horizontal,
    /// `C`: the corner at the opening; the full velocity is reflected.
    Corner,
}

impl WallKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "V" => Some(WallKind::Vertical),
            "H" => Some(WallKind::Horizontal),
            "C" => Some(WallKind::Corner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallCollision {
    pub side: BoxSide,
    pub time: f64,
    /// Particle velocity at the moment of impact.
    pub velocity: DVec2,
    pub wall: WallKind,
}

impl WallCollision {
    /// Normal momentum transferred to the wall, per unit particle mass.
    pub fn impulse(&self) -> f64 {
        match self.wall {
            WallKind::Vertical => 2.0 * self.velocity.x.abs(),
            WallKind::Horizontal => 2.0 * self.velocity.y.abs(),
            WallKind::Corner => 2.0 * self.velocity.mag(),
        }
    }
}

/// Parse `box_id t vx vy wall` records. Records for unknown boxes are
/// skipped with a warning.
pub fn parse_collisions(path: &Path, text: &str) -> Result<Vec<WallCollision>> {
    let mut collisions = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in data_lines(text) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 5 {
            return Err(AnalysisError::parse(
                path,
                line_no,
                format!("expected 5 values (box_id t vx vy wall), found {}", tokens.len()),
            ));
        }
        let box_id = tokens[0].parse::<i64>().map_err(|_| {
            AnalysisError::parse(path, line_no, format!("invalid box id '{}'", tokens[0]))
        })?;
        let time = parse_f64(path, line_no, tokens[1])?;
        let vx = parse_f64(path, line_no, tokens[2])?;
        let vy = parse_f64(path, line_no, tokens[3])?;
        let wall = WallKind::from_code(tokens[4]).ok_or_else(|| {
            AnalysisError::parse(path, line_no, format!("unknown wall kind '{}'", tokens[4]))
        })?;

        match BoxSide::from_id(box_id) {
            Some(side) => collisions.push(WallCollision {
                side,
                time,
                velocity: DVec2::new(vx, vy),
                wall,
            }),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!(
            "{}: skipped {} collisions with unknown box id",
            path.display(),
            skipped
        );
    }
    Ok(collisions)
}

pub fn load_collisions<P: AsRef<Path>>(path: P) -> Result<Vec<WallCollision>> {
    profile_scope!("load_collisions");
    let (resolved, text) = read_text(path.as_ref())?;
    let collisions = parse_collisions(&resolved, &text)?;
    log::info!("Read {} wall collisions from {}", collisions.len(), resolved.display());
    Ok(collisions)
}
