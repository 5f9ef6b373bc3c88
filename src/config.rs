//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.labelpos.toml` files.

use crate::tally::{MatchMode, DEFAULT_MARKER};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".labelpos.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Label matching settings.
    #[serde(default)]
    pub tally: TallyConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Label matching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Text searched for in the first field of each line.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// `substring` (default) or `exact`.
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            match_mode: MatchMode::default(),
        }
    }
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

/// Bar chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart output path. The extension picks the format (svg or png).
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_x_label")]
    pub x_label: String,

    #[serde(default = "default_y_label")]
    pub y_label: String,

    /// Bar colour as `#rrggbb`.
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            title: default_title(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            color: default_color(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("correct_label_positions.svg")
}

fn default_title() -> String {
    "Frequency of \"correct\" label in each position generated by GPT".to_string()
}

fn default_x_label() -> String {
    "Position of the generated paraphrase".to_string()
}

fn default_y_label() -> String {
    "Frequency of \"correct\" label".to_string()
}

fn default_color() -> String {
    "#2e7bab".to_string()
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    800
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref marker) = args.marker {
            self.tally.marker = marker.clone();
        }
        if args.exact {
            self.tally.match_mode = MatchMode::Exact;
        }
        if let Some(ref output) = args.output {
            self.chart.output = output.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Args, OutputFormat};

    fn make_args() -> Args {
        Args {
            file_path: Some(PathBuf::from("labels.txt")),
            output: None,
            format: OutputFormat::Chart,
            marker: None,
            exact: false,
            no_chart: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tally.marker, "correct");
        assert_eq!(config.tally.match_mode, MatchMode::Substring);
        assert_eq!(config.chart.color, "#2e7bab");
        assert_eq!(
            config.chart.output,
            PathBuf::from("correct_label_positions.svg")
        );
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[tally]
marker = "right"
match_mode = "exact"

[chart]
output = "out.png"
title = "Custom title"
width = 640
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.tally.marker, "right");
        assert_eq!(config.tally.match_mode, MatchMode::Exact);
        assert_eq!(config.chart.output, PathBuf::from("out.png"));
        assert_eq!(config.chart.title, "Custom title");
        assert_eq!(config.chart.width, 640);
        assert_eq!(config.chart.height, 800);
        assert_eq!(config.chart.x_label, "Position of the generated paraphrase");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tally.marker, "correct");
        assert_eq!(config.chart.width, 1200);
    }

    #[test]
    fn test_invalid_match_mode_rejected() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[tally]\nmatch_mode = \"fuzzy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[chart]\ncolor = \"#ff0000\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.chart.color, "#ff0000");

        assert!(Config::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();

        config.merge_with_args(&args);
        assert_eq!(config.tally.marker, "correct");
        assert_eq!(config.tally.match_mode, MatchMode::Substring);

        args.marker = Some("good".to_string());
        args.exact = true;
        args.output = Some(PathBuf::from("chart.png"));
        config.merge_with_args(&args);
        assert_eq!(config.tally.marker, "good");
        assert_eq!(config.tally.match_mode, MatchMode::Exact);
        assert_eq!(config.chart.output, PathBuf::from("chart.png"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[tally]"));
        assert!(toml_str.contains("[chart]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.chart.title, Config::default().chart.title);
    }
}
