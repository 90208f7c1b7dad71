//! Logger error types

use std::path::PathBuf;
use thiserror::Error;

/// Telemetry logger errors
#[derive(Debug, Error)]
pub enum LoggerError {
    /// An output file could not be opened; fatal to starting a session
    #[error("failed to open output files: {path}: {source}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wall clock unavailable; callers degrade to a placeholder timestamp
    #[error("clock unavailable: {0}")]
    Clock(String),
}

impl LoggerError {
    /// Create an open-output error
    pub fn open_output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OpenOutput {
            path: path.into(),
            source,
        }
    }

    /// Create a clock error
    pub fn clock(message: impl Into<String>) -> Self {
        Self::Clock(message.into())
    }
}
