use std::path::Path;
use ultraviolet::DVec2;

use super::{data_lines, parse_f64, read_text};
use crate::error::{AnalysisError, Result};
use crate::profile_scope;

/// One output frame: every particle's position and velocity at `time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub time: f64,
    pub positions: Vec<DVec2>,
    pub velocities: Vec<DVec2>,
}

impl Frame {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            positions: Vec::new(),
            velocities: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// All frames of a run, in file order. Every frame holds the same number
/// of particles.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    pub frames: Vec<Frame>,
}

impl Trajectory {
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        if let Some(first) = frames.first() {
            let expected = first.len();
            for (i, frame) in frames.iter().enumerate() {
                if frame.len() != expected {
                    return Err(AnalysisError::FrameSize {
                        frame: i,
                        expected,
                        found: frame.len(),
                    });
                }
            }
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn particle_count(&self) -> usize {
        self.frames.first().map_or(0, Frame::len)
    }

    pub fn times(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.time).collect()
    }

    /// Parse `output.txt` content. A single-value line opens a frame at that
    /// time; each `x y vx vy` line adds a particle to the open frame.
    ///
    /// With `expected` set, a short final frame (interrupted write) is
    /// dropped; any other frame of the wrong size is an error.
    pub fn parse(path: &Path, text: &str, expected: Option<usize>) -> Result<Self> {
        let mut frames: Vec<Frame> = Vec::new();
        let mut current: Option<Frame> = None;

        for (line_no, line) in data_lines(text) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.len() {
                1 => {
                    let time = parse_f64(path, line_no, tokens[0])?;
                    if let Some(frame) = current.take() {
                        frames.push(frame);
                    }
                    current = Some(Frame::new(time));
                }
                4 => {
                    let frame = current.as_mut().ok_or_else(|| {
                        AnalysisError::parse(path, line_no, "particle line before the first time line")
                    })?;
                    let x = parse_f64(path, line_no, tokens[0])?;
                    let y = parse_f64(path, line_no, tokens[1])?;
                    let vx = parse_f64(path, line_no, tokens[2])?;
                    let vy = parse_f64(path, line_no, tokens[3])?;
                    frame.positions.push(DVec2::new(x, y));
                    frame.velocities.push(DVec2::new(vx, vy));
                }
                n => {
                    return Err(AnalysisError::parse(
                        path,
                        line_no,
                        format!("expected 1 (time) or 4 (x y vx vy) values, found {}", n),
                    ));
                }
            }
        }
        if let Some(frame) = current.take() {
            frames.push(frame);
        }

        let expected = expected.or_else(|| frames.first().map(Frame::len));
        if let (Some(n), Some(last)) = (expected, frames.last()) {
            if last.len() < n {
                log::warn!(
                    "{}: dropping incomplete final frame at t={} ({} of {} particles)",
                    path.display(),
                    last.time,
                    last.len(),
                    n
                );
                frames.pop();
            }
        }
        if let Some(n) = expected {
            if let Some((i, frame)) = frames.iter().enumerate().find(|(_, f)| f.len() != n) {
                return Err(AnalysisError::FrameSize {
                    frame: i,
                    expected: n,
                    found: frame.len(),
                });
            }
        }

        Ok(Self { frames })
    }
}

/// Load a trajectory file, checking frame sizes against `expected` particles.
pub fn load_trajectory<P: AsRef<Path>>(path: P, expected: Option<usize>) -> Result<Trajectory> {
    profile_scope!("load_trajectory");
    let (resolved, text) = read_text(path.as_ref())?;
    let trajectory = Trajectory::parse(&resolved, &text, expected)?;
    log::info!(
        "Read {} frames of {} particles from {}",
        trajectory.len(),
        trajectory.particle_count(),
        resolved.display()
    );
    Ok(trajectory)
}
