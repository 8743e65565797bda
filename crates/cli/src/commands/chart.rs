//! Chart command
//!
//! Implements `apsg chart`, drawing the layout as plain text.

use chrono::Local;
use clap::Args;

use aps_timeline::GanttConfig;

use super::ScheduleArgs;
use crate::error::{CliError, CliResult};
use crate::output::format_chart;

/// Default horizontal scale of the text chart
const DEFAULT_PX_PER_CHAR: f64 = 8.0;

/// Finest accepted scale: one pixel per character
const MIN_PX_PER_CHAR: f64 = 1.0;

/// Draw a plain-text Gantt chart
#[derive(Debug, Args)]
pub struct ChartCommand {
    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Pixels per character; larger values give a narrower chart
    #[arg(long = "px-per-char", default_value_t = DEFAULT_PX_PER_CHAR)]
    pub px_per_char: f64,
}

impl ChartCommand {
    /// Execute the chart command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` for a scale below one pixel per
    /// character, or the input errors of [`ScheduleArgs::layout`].
    pub fn execute(&self, config: &GanttConfig) -> CliResult<String> {
        if !self.px_per_char.is_finite() || self.px_per_char < MIN_PX_PER_CHAR {
            return Err(CliError::InvalidArgument(format!(
                "--px-per-char must be a finite number of at least {MIN_PX_PER_CHAR}, got {}",
                self.px_per_char
            )));
        }

        let layout = self.schedule.layout(config)?;
        Ok(format_chart(&layout, self.px_per_char, &Local))
    }
}
