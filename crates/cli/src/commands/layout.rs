//! Layout command
//!
//! Implements `apsg layout`, printing the composed layout as an aligned
//! table or as JSON.

use chrono::Local;
use clap::Args;

use aps_timeline::GanttConfig;

use super::ScheduleArgs;
use crate::error::CliResult;
use crate::output::format_layout_table;

/// Print the computed layout
#[derive(Debug, Args)]
pub struct LayoutCommand {
    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl LayoutCommand {
    /// Execute the layout command.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the input cannot be read or parsed.
    pub fn execute(&self, config: &GanttConfig) -> CliResult<String> {
        let layout = self.schedule.layout(config)?;
        if self.json {
            Ok(serde_json::to_string_pretty(&layout)?)
        } else {
            Ok(format_layout_table(&layout, &Local))
        }
    }
}
