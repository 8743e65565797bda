//! Error types for the TUI.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use aps_timeline::TimelineError;

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// Failed to initialize or restore the terminal.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// The schedule file could not be read.
    #[error("Failed to read schedule file {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The schedule file is not a recognized JSON document.
    #[error("Failed to parse schedule file {path}: {source}")]
    ParseInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Schedule data or configuration was rejected by the layout engine.
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Missing or malformed command line arguments.
    #[error("{0}")]
    Usage(String),
}
