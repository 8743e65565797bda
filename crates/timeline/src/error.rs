//! Error types for the timeline engine.
//!
//! Layout computations themselves are total. Errors only arise at the
//! boundaries: validating configuration and parsing timestamps.

use thiserror::Error;

/// Timeline engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Step size must be between one minute and one week
    #[error("Invalid step: {minutes} minutes (must be between 1 and {max})")]
    InvalidStep { minutes: u32, max: u32 },

    /// Column width must be a positive, finite pixel count within the cap
    #[error("Invalid column width: {width_px}px (must be above 0 and at most {max_px})")]
    InvalidColumnWidth { width_px: f64, max_px: f64 },

    /// The fallback window for empty schedules is out of bounds
    #[error("Invalid empty window: {hours} hours (must be between 1 and {max})")]
    InvalidEmptyWindow { hours: u32, max: u32 },

    /// A timestamp string could not be parsed into an instant
    #[error("Invalid timestamp '{value}' in field '{field}' of record '{record_id}'")]
    InvalidTimestamp {
        record_id: String,
        field: &'static str,
        value: String,
    },
}

/// Result type alias for timeline operations
pub type TimelineResult<T> = Result<T, TimelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_step_display() {
        let err = TimelineError::InvalidStep {
            minutes: 0,
            max: 10_080,
        };
        assert_eq!(
            err.to_string(),
            "Invalid step: 0 minutes (must be between 1 and 10080)"
        );
    }

    #[test]
    fn test_invalid_column_width_display() {
        let err = TimelineError::InvalidColumnWidth {
            width_px: -4.0,
            max_px: 4096.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid column width: -4px (must be above 0 and at most 4096)"
        );
    }

    #[test]
    fn test_invalid_empty_window_display() {
        let err = TimelineError::InvalidEmptyWindow { hours: 0, max: 744 };
        assert_eq!(
            err.to_string(),
            "Invalid empty window: 0 hours (must be between 1 and 744)"
        );
    }

    #[test]
    fn test_invalid_timestamp_display() {
        let err = TimelineError::InvalidTimestamp {
            record_id: "s-1".to_string(),
            field: "startAt",
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid timestamp 'yesterday' in field 'startAt' of record 's-1'"
        );
    }
}
