//! Color command
//!
//! Implements `apsg color`, showing the colors a group id resolves to under
//! the current configuration.

use clap::Args;

use aps_timeline::{GanttConfig, Palette};

use crate::error::CliResult;
use crate::output::format_group_color;

/// Show the resolved colors for a group
#[derive(Debug, Args)]
pub struct ColorCommand {
    /// Group id (job id or tool id)
    pub group_id: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ColorCommand {
    /// Execute the color command.
    pub fn execute(&self, config: &GanttConfig) -> CliResult<String> {
        let color = Palette::from_config(config).resolve(&self.group_id);
        if self.json {
            Ok(serde_json::to_string_pretty(&color)?)
        } else {
            Ok(format_group_color(&self.group_id, &color))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aps_timeline::{ColorOverride, hash_hue};

    fn color_cmd(group_id: &str, json: bool) -> ColorCommand {
        ColorCommand {
            group_id: group_id.to_string(),
            json,
        }
    }

    #[test]
    fn test_color_uses_hashed_hue() {
        let output = color_cmd("a", false).execute(&GanttConfig::new()).unwrap();
        assert_eq!(hash_hue("a"), 97.0);
        assert!(output.contains("Hue:    97"));
        assert!(output.contains("hsla(97, 85%, 55%, 0.22)"));
    }

    #[test]
    fn test_color_applies_offset() {
        let config = GanttConfig::new().with_hue_offset(300.0);
        let output = color_cmd("a", false).execute(&config).unwrap();
        assert!(output.contains("Hue:    37"));
    }

    #[test]
    fn test_color_explicit_override_json() {
        let config = GanttConfig::new()
            .with_group_color("oven", ColorOverride::explicit("#fde68a", "#b45309"));
        let output = color_cmd("oven", true).execute(&config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["fillColor"], "#fde68a");
        assert_eq!(json["borderColor"], "#b45309");
        assert_eq!(json["accentColor"], "#b45309");
    }
}
