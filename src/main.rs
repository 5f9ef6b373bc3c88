//! labelpos - position analysis of "correct" labels
//!
//! Reads a text file of sampled labels where every ten consecutive lines are
//! the paraphrases generated for one seed utterance, counts how often the
//! "correct" label shows up at each of the ten positions, and draws the
//! distribution as a bar chart.
//!
//! Exit codes:
//!   0 - Run finished (unreadable input and misaligned line counts are
//!       reported on the terminal, not through the exit code)
//!   1 - Invalid arguments, unreadable config, or the chart could not be written

mod chart;
mod cli;
mod config;
mod reader;
mod report;
mod tally;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{ChartConfig, Config, CONFIG_FILE_NAME};
use report::Report;
use std::path::Path;
use tally::{LabelMatcher, TallyError};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("labelpos v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .labelpos.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the marker, match mode, and chart labels.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Result of analyzing one input file.
#[derive(Debug)]
enum Outcome {
    /// The line count does not split into whole blocks; nothing was tallied.
    Misaligned(TallyError),
    Tallied(Report),
}

/// Read, validate, tally and, when `chart_config` is given, render.
fn analyze(
    file_path: &Path,
    matcher: &LabelMatcher,
    chart_config: Option<&ChartConfig>,
) -> Result<Outcome> {
    info!("Reading labels from {}", file_path.display());
    let lines = reader::read_lines_or_empty(file_path);

    if let Err(e) = tally::validate_alignment(lines.len()) {
        match e {
            TallyError::Misaligned { line_count } => {
                warn!("Skipping analysis: {} lines do not form whole blocks", line_count)
            }
        }
        return Ok(Outcome::Misaligned(e));
    }

    let frequencies = tally::tally(&lines, matcher);
    let report = Report::new(file_path, lines.len(), matcher, frequencies);

    if report.frequencies.is_empty() {
        info!("No qualifying labels found for marker \"{}\"", matcher.marker);
    }

    if let Some(config) = chart_config {
        chart::render_bar_chart(&report.frequencies, config)
            .with_context(|| format!("Failed to write chart to {}", config.output.display()))?;
    }

    Ok(Outcome::Tallied(report))
}

/// Run the analysis and print the requested output.
fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let file_path = args
        .file_path
        .as_deref()
        .context("--file_path is required")?;

    let matcher = LabelMatcher::new(config.tally.marker.clone(), config.tally.match_mode);
    let chart_config = args.writes_chart().then_some(&config.chart);

    let report = match analyze(file_path, &matcher, chart_config)? {
        Outcome::Misaligned(e) => {
            println!("{}", e);
            return Ok(());
        }
        Outcome::Tallied(report) => report,
    };

    match args.format {
        OutputFormat::Json => {
            println!("{}", report::generate_json_report(&report)?);
        }
        OutputFormat::Text => {
            print!("{}", report::generate_text_chart(&report.frequencies));
        }
        OutputFormat::Chart => {
            print!("{}", report::generate_summary(&report));

            if chart_config.is_some() {
                println!("\n✅ Chart saved to: {}", config.chart.output.display());
            } else {
                debug!("--no-chart given, chart file skipped");
            }
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
