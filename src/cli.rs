//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// labelpos - where does the "correct" label land?
///
/// Reads a file of labeled records in blocks of ten consecutive lines
/// (ten generated paraphrases per seed utterance) and counts how often the
/// "correct" label appears at each position within a block.
///
/// Examples:
///   labelpos --file_path sampled_labels.txt
///   labelpos -f sampled_labels.txt --output positions.png
///   labelpos -f sampled_labels.txt --format json
///   labelpos --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the text file with the sampled labels
    #[arg(
        short,
        long,
        alias = "file_path",
        value_name = "FILE",
        required_unless_present = "init_config"
    )]
    pub file_path: Option<PathBuf>,

    /// Chart output path (.svg or .png)
    ///
    /// Defaults to the config value, correct_label_positions.svg.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (chart, json, text)
    #[arg(long, default_value = "chart", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Marker searched for in the first field of each line
    #[arg(long, value_name = "TEXT", env = "LABELPOS_MARKER")]
    pub marker: Option<String>,

    /// Require the first field to equal the marker instead of containing it
    #[arg(long)]
    pub exact: bool,

    /// Do not write the chart file
    #[arg(long)]
    pub no_chart: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .labelpos.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .labelpos.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// What the run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Bar chart file plus a terminal summary (default)
    #[default]
    Chart,
    /// JSON report on stdout
    Json,
    /// Terminal bar chart only
    Text,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether this run writes a chart file.
    pub fn writes_chart(&self) -> bool {
        self.format == OutputFormat::Chart && !self.no_chart
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref marker) = self.marker {
            if marker.is_empty() {
                return Err("Marker must not be empty".to_string());
            }
        }

        if self.writes_chart() {
            if let Some(ref output) = self.output {
                let ext = output
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase());
                if !matches!(ext.as_deref(), Some("svg") | Some("png")) {
                    return Err(format!(
                        "Chart output must end in .svg or .png: {}",
                        output.display()
                    ));
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
