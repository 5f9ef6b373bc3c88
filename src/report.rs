//! Report generation.
//!
//! Turns a frequency table into the terminal summary, the terminal bar chart
//! and the JSON document printed by `--format json`.

use crate::tally::{FrequencyTable, LabelMatcher, MatchMode, BLOCK_SIZE};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Width in characters of the longest bar in the terminal chart.
const TEXT_BAR_WIDTH: u64 = 40;

/// Metadata about the analyzed file.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Input file as given on the command line.
    pub source_file: String,
    /// Number of lines read.
    pub line_count: usize,
    /// Number of ten-line blocks.
    pub block_count: usize,
    /// Marker searched for in the label field.
    pub marker: String,
    pub match_mode: MatchMode,
    pub generated_at: DateTime<Utc>,
}

/// Complete result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Observed positions only.
    pub frequencies: FrequencyTable,
    pub total_qualifying: u64,
}

impl Report {
    pub fn new(
        source: &Path,
        line_count: usize,
        matcher: &LabelMatcher,
        frequencies: FrequencyTable,
    ) -> Self {
        let metadata = ReportMetadata {
            source_file: source.display().to_string(),
            line_count,
            block_count: line_count / BLOCK_SIZE,
            marker: matcher.marker.clone(),
            match_mode: matcher.mode,
            generated_at: Utc::now(),
        };

        Self {
            metadata,
            total_qualifying: frequencies.total(),
            frequencies,
        }
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render the table as horizontal bars, one row per position.
///
/// Positions that never qualified show `-` instead of a count.
pub fn generate_text_chart(table: &FrequencyTable) -> String {
    let max = table.max_count();
    let mut chart = String::new();

    for position in 0..BLOCK_SIZE {
        match table.get(position) {
            Some(count) => {
                let len = (count * TEXT_BAR_WIDTH / max).max(1) as usize;
                chart.push_str(&format!(
                    "   {:>2} | {} {}\n",
                    position,
                    "█".repeat(len),
                    count
                ));
            }
            None => chart.push_str(&format!("   {:>2} | -\n", position)),
        }
    }

    chart
}

/// Generate the summary printed after a run.
pub fn generate_summary(report: &Report) -> String {
    let metadata = &report.metadata;
    let mut summary = String::new();

    summary.push_str("\n📊 Position Summary:\n");
    summary.push_str(&format!("   File: {}\n", metadata.source_file));
    summary.push_str(&format!(
        "   Lines: {} ({} blocks of {})\n",
        metadata.line_count, metadata.block_count, BLOCK_SIZE
    ));
    summary.push_str(&format!(
        "   Marker: \"{}\" ({} match)\n",
        metadata.marker, metadata.match_mode
    ));
    summary.push_str(&format!(
        "   Qualifying labels: {}\n\n",
        report.total_qualifying
    ));
    summary.push_str(&generate_text_chart(&report.frequencies));

    summary
}
