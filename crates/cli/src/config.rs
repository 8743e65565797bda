//! Configuration resolution for the CLI.
//!
//! A `GanttConfig` is assembled from, in decreasing priority:
//! 1. Command line flags
//! 2. `APSG_*` environment variables (handled by clap's `env`)
//! 3. The config file: `--config`, then `APSG_CONFIG`, then
//!    `~/.apsg/config.json` if it exists
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use aps_timeline::GanttConfig;

use crate::error::{CliError, CliResult};

/// Environment variable name for the config file path
pub const APSG_CONFIG_ENV: &str = "APSG_CONFIG";

/// Directory under the home directory holding the default config file
const DEFAULT_CONFIG_DIR: &str = ".apsg";

const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Grid options accepted by every layout command.
#[derive(Debug, Clone, Default, Args)]
pub struct GridArgs {
    /// Step size in minutes
    #[arg(long, global = true, env = "APSG_STEP_MINUTES")]
    pub step: Option<u32>,

    /// Width of one step column in pixels
    #[arg(long = "col-width", global = true, env = "APSG_COL_WIDTH")]
    pub col_width: Option<f64>,

    /// Hue rotation applied to every group color, in degrees
    #[arg(
        long = "hue-offset",
        global = true,
        env = "APSG_HUE_OFFSET",
        allow_hyphen_values = true
    )]
    pub hue_offset: Option<f64>,

    /// Use the denser preset widths
    #[arg(long, global = true)]
    pub compact: bool,
}

impl GridArgs {
    /// Overlay these options on `config`.
    pub fn apply(&self, mut config: GanttConfig) -> GanttConfig {
        if let Some(step) = self.step {
            config.step_minutes = step;
        }
        if let Some(width) = self.col_width {
            config.col_width_px = Some(width);
        }
        if let Some(offset) = self.hue_offset {
            config.hue_offset = offset;
        }
        if self.compact {
            config.compact = true;
        }
        config
    }
}

/// Default config file location (`~/.apsg/config.json`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE))
}

/// Get the config file path from the command line, environment, or default.
///
/// Priority:
/// 1. Command line --config argument
/// 2. APSG_CONFIG environment variable (if non-empty)
/// 3. Default path, only if the file exists
pub fn resolve_config_path(cli_config: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = cli_config {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(APSG_CONFIG_ENV)
        && !env_path.is_empty()
    {
        return Some(PathBuf::from(env_path));
    }

    default_config_path().filter(|path| path.is_file())
}

/// Read a config file. `None` yields the defaults.
///
/// # Errors
///
/// Returns `CliError::ReadInput` if the file cannot be read and
/// `CliError::ParseConfig` if it is not a valid config.
pub fn load_config_file(path: Option<&Path>) -> CliResult<GanttConfig> {
    let Some(path) = path else {
        return Ok(GanttConfig::default());
    };

    let text = fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Resolve the effective config and validate it.
///
/// # Errors
///
/// Returns file errors from [`load_config_file`] and
/// `CliError::Timeline` if the resulting grid settings are invalid.
pub fn resolve_config(cli_config: Option<PathBuf>, grid: &GridArgs) -> CliResult<GanttConfig> {
    let path = resolve_config_path(cli_config);
    let config = grid.apply(load_config_file(path.as_deref())?);
    config.validate()?;
    Ok(config)
}
