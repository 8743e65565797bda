//! CLI commands for APS Gantt
//!
//! This module contains all subcommand implementations for the apsg CLI.

pub mod chart;
pub mod color;
pub mod layout;

pub use chart::ChartCommand;
pub use color::ColorCommand;
pub use layout::LayoutCommand;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use clap::{Args, Subcommand};
use tracing::debug;

use aps_timeline::{CollapseState, GanttConfig, GanttLayout, Group, GroupBy, ScheduleDocument};

use crate::error::{CliError, CliResult};

/// Input path meaning "read standard input"
const STDIN_PATH: &str = "-";

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the computed layout as a table or JSON
    Layout(LayoutCommand),
    /// Draw a plain-text Gantt chart
    Chart(ChartCommand),
    /// Show the resolved colors for a group id
    Color(ColorCommand),
}

impl Command {
    /// Execute the command with the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the input cannot be read or parsed.
    pub fn execute(&self, config: &GanttConfig) -> CliResult<String> {
        match self {
            Command::Layout(cmd) => cmd.execute(config),
            Command::Chart(cmd) => cmd.execute(config),
            Command::Color(cmd) => cmd.execute(config),
        }
    }
}

/// Schedule input shared by the layout commands.
#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    /// Schedule JSON file, or `-` for stdin
    pub input: PathBuf,

    /// Group records by job or tool
    #[arg(short, long = "group-by", default_value_t = GroupBy::Tool)]
    pub group_by: GroupBy,

    /// Collapse a group (can be specified multiple times)
    #[arg(short, long = "collapse")]
    pub collapse: Vec<String>,
}

impl ScheduleArgs {
    /// Read the input and build display groups in the local time zone.
    pub fn load_groups(&self) -> CliResult<Vec<Group>> {
        let document = read_document(&self.input)?;
        let groups = document.to_groups(self.group_by, &Local)?;
        debug!(
            input = %self.input.display(),
            groups = groups.len(),
            pre_grouped = document.is_pre_grouped(),
            "loaded schedule"
        );
        Ok(groups)
    }

    /// Collapse state with every `--collapse` id collapsed.
    pub fn collapse_state(&self) -> CollapseState {
        self.collapse
            .iter()
            .fold(CollapseState::new(), |state, id| {
                if state.is_collapsed(id) {
                    state
                } else {
                    state.toggled(id)
                }
            })
    }

    /// Load the input and lay it out with `config`.
    pub fn layout(&self, config: &GanttConfig) -> CliResult<GanttLayout> {
        let groups = self.load_groups()?;
        Ok(GanttLayout::build(
            &groups,
            config,
            &self.collapse_state(),
            Utc::now(),
        ))
    }
}

/// Parse a schedule document from `path`, or from stdin for `-`.
///
/// # Errors
///
/// Returns `CliError::ReadInput` or `CliError::ParseInput`.
pub fn read_document(path: &Path) -> CliResult<ScheduleDocument> {
    let read_error = |source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    };

    let text = if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(read_error)?;
        text
    } else {
        fs::read_to_string(path).map_err(read_error)?
    };

    serde_json::from_str(&text).map_err(|source| CliError::ParseInput {
        path: path.to_path_buf(),
        source,
    })
}
