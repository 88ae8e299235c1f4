use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{data_lines, parse_f64, read_text};
use crate::error::{AnalysisError, Result};
use crate::profile_scope;

/// Run parameters from `params.txt`:
/// `L N radius BOX1_W BOX2_W BOX1_H` on the first data line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Height of the right box, equal to the opening between the boxes.
    pub channel_width: f64,
    pub particle_count: usize,
    pub radius: f64,
    pub box1_width: f64,
    pub box2_width: f64,
    pub box1_height: f64,
}

impl SimParams {
    /// Parse the content of a params file.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let (line_no, line) = data_lines(text)
            .next()
            .ok_or_else(|| AnalysisError::parse(path, 0, "no parameter line"))?;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 6 {
            return Err(AnalysisError::parse(
                path,
                line_no,
                format!("expected 6 values (L N radius BOX1_W BOX2_W BOX1_H), found {}", tokens.len()),
            ));
        }
        let values = tokens
            .iter()
            .map(|t| parse_f64(path, line_no, t))
            .collect::<Result<Vec<f64>>>()?;

        let n = values[1];
        if n < 1.0 || n.fract() != 0.0 {
            return Err(AnalysisError::parse(
                path,
                line_no,
                format!("particle count must be a positive integer, found {}", n),
            ));
        }

        let params = SimParams {
            channel_width: values[0],
            particle_count: n as usize,
            radius: values[2],
            box1_width: values[3],
            box2_width: values[4],
            box1_height: values[5],
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("L", self.channel_width),
            ("radius", self.radius),
            ("BOX1_W", self.box1_width),
            ("BOX2_W", self.box2_width),
            ("BOX1_H", self.box1_height),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalysisError::InvalidParameter(format!(
                    "{} must be positive, found {}",
                    name, value
                )));
            }
        }
        if self.channel_width > self.box1_height {
            return Err(AnalysisError::InvalidParameter(format!(
                "channel width {} exceeds left box height {}",
                self.channel_width, self.box1_height
            )));
        }
        Ok(())
    }
}

pub fn load_params<P: AsRef<Path>>(path: P) -> Result<SimParams> {
    profile_scope!("load_params");
    let (resolved, text) = read_text(path.as_ref())?;
    SimParams::parse(&resolved, &text)
}
