//! Error type shared by the loaders, reductions and renderers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file not found: {0}")]
    MissingFile(PathBuf),

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no data: {0}")]
    Empty(String),

    #[error("frame {frame} has {found} particles, expected {expected}")]
    FrameSize {
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("plotting error: {0}")]
    Plotting(String),

    #[error("CSV error for '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        AnalysisError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
