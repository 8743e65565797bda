//! Error types for the CLI.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use aps_timeline::TimelineError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// The schedule file could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The schedule file is not a recognized schedule document.
    #[error("Failed to parse schedule {path}: {source}")]
    ParseInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file is not a valid `GanttConfig`.
    #[error("Invalid config file {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Rejected by the layout engine.
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// Serializing output failed.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A command line value outside its allowed range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Message including the underlying cause chain, for printing to stderr.
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(&format!(": {text}"));
            }
            source = cause.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_input_display() {
        let err = CliError::ReadInput {
            path: PathBuf::from("/tmp/plan.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
        };
        assert_eq!(err.to_string(), "Failed to read /tmp/plan.json: No such file");
    }

    #[test]
    fn test_timeline_error_is_transparent() {
        let inner = TimelineError::InvalidStep {
            minutes: 0,
            max: 10_080,
        };
        let err: CliError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn test_full_message_does_not_repeat_source() {
        let err = CliError::ReadInput {
            path: PathBuf::from("a.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.full_message(), "Failed to read a.json: gone");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::InvalidArgument("--px-per-char must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid argument: --px-per-char must be positive"
        );
    }
}
