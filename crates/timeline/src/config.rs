//! Layout configuration
//!
//! Mirrors the option set of the Gantt view: grid granularity, column and
//! label widths, color overrides and the empty-data window policy. All
//! fields have defaults so partial JSON config files deserialize cleanly.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::color::ColorOverride;
use crate::error::{TimelineError, TimelineResult};

/// Default grid step in minutes.
pub const DEFAULT_STEP_MINUTES: u32 = 60;

/// Default pixel width of one step column.
pub const DEFAULT_COL_WIDTH_PX: f64 = 64.0;

/// Column width used by the compact preset.
pub const COMPACT_COL_WIDTH_PX: f64 = 56.0;

/// Default width of the label column on the left.
pub const DEFAULT_LEFT_WIDTH_PX: f64 = 280.0;

/// Label column width used by the compact preset.
pub const COMPACT_LEFT_WIDTH_PX: f64 = 240.0;

/// Length of the synthetic window shown when there are no tasks.
pub const DEFAULT_EMPTY_WINDOW_HOURS: u32 = 8;

/// Largest accepted step: one week.
pub const MAX_STEP_MINUTES: u32 = 7 * 24 * 60;

/// Largest accepted column width.
pub const MAX_COL_WIDTH_PX: f64 = 4096.0;

/// Largest accepted empty-data window: 31 days.
pub const MAX_EMPTY_WINDOW_HOURS: u32 = 31 * 24;

/// Configuration consumed by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GanttConfig {
    /// Grid time-bucket size in minutes.
    pub step_minutes: u32,
    /// Pixel width per step. Falls back to the (compact) default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_width_px: Option<f64>,
    /// Reserved label-column width. Layout only; not used by range math.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_width_px: Option<f64>,
    /// Per-group color overrides keyed by group id.
    pub group_colors: BTreeMap<String, ColorOverride>,
    /// Global hue rotation applied to every derived color.
    pub hue_offset: f64,
    /// Length of the fallback window when no task exists.
    pub empty_window_hours: u32,
    /// Use the denser preset widths.
    pub compact: bool,
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
            col_width_px: None,
            left_width_px: None,
            group_colors: BTreeMap::new(),
            hue_offset: 0.0,
            empty_window_hours: DEFAULT_EMPTY_WINDOW_HOURS,
            compact: false,
        }
    }
}

impl GanttConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config using the compact preset widths.
    pub fn compact() -> Self {
        Self {
            compact: true,
            ..Self::default()
        }
    }

    /// Set the step size in minutes.
    pub fn with_step_minutes(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }

    /// Set the column width in pixels.
    pub fn with_col_width_px(mut self, col_width_px: f64) -> Self {
        self.col_width_px = Some(col_width_px);
        self
    }

    /// Set the global hue offset.
    pub fn with_hue_offset(mut self, hue_offset: f64) -> Self {
        self.hue_offset = hue_offset;
        self
    }

    /// Add a color override for one group.
    pub fn with_group_color(mut self, group_id: impl Into<String>, color: ColorOverride) -> Self {
        self.group_colors.insert(group_id.into(), color);
        self
    }

    /// Set the fallback window length used when there are no tasks.
    pub fn with_empty_window_hours(mut self, hours: u32) -> Self {
        self.empty_window_hours = hours;
        self
    }

    /// Effective column width, honoring the compact preset.
    pub fn col_width_px(&self) -> f64 {
        self.col_width_px.unwrap_or(if self.compact {
            COMPACT_COL_WIDTH_PX
        } else {
            DEFAULT_COL_WIDTH_PX
        })
    }

    /// Effective label column width, honoring the compact preset.
    pub fn left_width_px(&self) -> f64 {
        self.left_width_px.unwrap_or(if self.compact {
            COMPACT_LEFT_WIDTH_PX
        } else {
            DEFAULT_LEFT_WIDTH_PX
        })
    }

    /// The step as a duration.
    pub fn step(&self) -> Duration {
        Duration::minutes(i64::from(self.step_minutes))
    }

    /// Check that the grid parameters can produce a layout.
    ///
    /// The layout functions accept any config and clamp what they must;
    /// this is where out-of-range settings are reported to the user.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidStep` if the step is zero or longer
    /// than [`MAX_STEP_MINUTES`].
    /// Returns `TimelineError::InvalidColumnWidth` if the column width is not
    /// a finite number in `(0, MAX_COL_WIDTH_PX]`.
    /// Returns `TimelineError::InvalidEmptyWindow` if the empty-data window
    /// is zero or longer than [`MAX_EMPTY_WINDOW_HOURS`].
    pub fn validate(&self) -> TimelineResult<()> {
        if self.step_minutes == 0 || self.step_minutes > MAX_STEP_MINUTES {
            return Err(TimelineError::InvalidStep {
                minutes: self.step_minutes,
                max: MAX_STEP_MINUTES,
            });
        }

        let width = self.col_width_px();
        if !width.is_finite() || width <= 0.0 || width > MAX_COL_WIDTH_PX {
            return Err(TimelineError::InvalidColumnWidth {
                width_px: width,
                max_px: MAX_COL_WIDTH_PX,
            });
        }

        if self.empty_window_hours == 0 || self.empty_window_hours > MAX_EMPTY_WINDOW_HOURS {
            return Err(TimelineError::InvalidEmptyWindow {
                hours: self.empty_window_hours,
                max: MAX_EMPTY_WINDOW_HOURS,
            });
        }

        Ok(())
    }
}
