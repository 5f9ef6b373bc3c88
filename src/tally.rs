//! Position tally over blocks of ten lines.
//!
//! Every run of [`BLOCK_SIZE`] consecutive lines is one block: a seed
//! utterance followed by its generated paraphrases. For each position inside
//! a block we count how many blocks carry a qualifying label there.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Number of lines in one block.
pub const BLOCK_SIZE: usize = 10;

/// Default marker looked for in the label field.
pub const DEFAULT_MARKER: &str = "correct";

/// Errors raised before tallying.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TallyError {
    #[error("The total number of rows in the file must be a multiple of 10.")]
    Misaligned { line_count: usize },
}

/// Check that the input splits into whole blocks.
pub fn validate_alignment(line_count: usize) -> Result<(), TallyError> {
    if line_count % BLOCK_SIZE != 0 {
        return Err(TallyError::Misaligned { line_count });
    }
    Ok(())
}

/// How a label is compared against the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Label contains the marker anywhere, so "incorrect" matches "correct".
    #[default]
    Substring,
    /// Label equals the marker.
    Exact,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::Exact => write!(f, "exact"),
        }
    }
}

/// First comma-separated field of the line, surrounding whitespace removed.
pub fn label(line: &str) -> &str {
    line.trim().split(',').next().unwrap_or("")
}

/// Decides whether a line carries a qualifying label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatcher {
    pub marker: String,
    pub mode: MatchMode,
}

impl Default for LabelMatcher {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            mode: MatchMode::Substring,
        }
    }
}

impl LabelMatcher {
    pub fn new(marker: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            marker: marker.into(),
            mode,
        }
    }

    /// Whether the line's label matches the marker (case-sensitive).
    pub fn qualifies(&self, line: &str) -> bool {
        let field = label(line);
        match self.mode {
            MatchMode::Substring => field.contains(self.marker.as_str()),
            MatchMode::Exact => field == self.marker,
        }
    }
}

/// Count of qualifying labels per block position.
///
/// Positions that never qualified are treated as absent: [`get`](Self::get)
/// returns `None` for them and [`observed`](Self::observed) skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrequencyTable {
    counts: [u64; BLOCK_SIZE],
}

impl FrequencyTable {
    /// Count at `position`, or `None` if it never qualified.
    pub fn get(&self, position: usize) -> Option<u64> {
        self.counts.get(position).copied().filter(|&count| count > 0)
    }

    /// Observed `(position, count)` pairs in position order.
    pub fn observed(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(position, &count)| (position, count))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.observed())
    }
}

/// Tally qualifying labels by position.
///
/// The position counter advances on every line, qualifying or not, and wraps
/// after [`BLOCK_SIZE`] lines.
pub fn tally<S: AsRef<str>>(lines: &[S], matcher: &LabelMatcher) -> FrequencyTable {
    let mut table = FrequencyTable::default();
    let mut position = 0;

    for line in lines {
        if matcher.qualifies(line.as_ref()) {
            table.counts[position] += 1;
        }
        position = (position + 1) % BLOCK_SIZE;
    }

    debug!(
        "Tallied {} lines: {} qualifying labels",
        lines.len(),
        table.total()
    );

    table
}
