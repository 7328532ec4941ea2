//! P-code column matching.
//!
//! A column is a P-code column when one of its header fragments looks like a
//! P-code header and at least [`MATCH_THRESHOLD`] of its non-null values are
//! known codes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::normalize::NormalizedTable;

use super::patterns::PCODE_HEADER;

/// Minimum fraction of values that must be known codes.
pub const MATCH_THRESHOLD: f64 = 0.9;

/// Upper-cased values treated as missing.
pub const NULL_TOKENS: &[&str] = &["NA", "NAN", "NONE", "NULL", ""];

/// What the candidate set contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Canonical codes; values are compared as written.
    #[default]
    Codes,
    /// Mis-code variants; zeros are stripped from values before comparing.
    Miscodes,
}

/// Per-column match statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMatch {
    pub column: String,
    pub matched: usize,
    pub total: usize,
}

impl ColumnMatch {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}

/// Scores table columns against a set of candidate codes.
#[derive(Debug, Clone)]
pub struct PcodeMatcher {
    threshold: f64,
}

impl Default for PcodeMatcher {
    fn default() -> Self {
        Self {
            threshold: MATCH_THRESHOLD,
        }
    }
}

impl PcodeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the match threshold (clamped to `0.0..=1.0`).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether a column key has a fragment that looks like a P-code header.
    pub fn is_candidate_header(key: &str) -> bool {
        PCODE_HEADER.matches_any(key.split(crate::normalize::COMPOSITE_SEPARATOR))
    }

    /// Score one column. Returns `None` when the header does not qualify or
    /// the column has no non-null values.
    pub fn score_column(
        &self,
        table: &NormalizedTable,
        index: usize,
        codes: &HashSet<&str>,
        mode: MatchMode,
    ) -> Option<ColumnMatch> {
        let key = table.columns.get(index)?;
        if !Self::is_candidate_header(key) {
            return None;
        }

        let mut matched = 0;
        let mut total = 0;
        for value in table.column_values(index) {
            let Some(value) = prepare_value(value, mode) else {
                continue;
            };
            total += 1;
            if codes.contains(value.as_str()) {
                matched += 1;
            }
        }

        if total == 0 {
            return None;
        }
        Some(ColumnMatch {
            column: key.clone(),
            matched,
            total,
        })
    }

    /// First column whose match ratio reaches the threshold.
    pub fn find(
        &self,
        table: &NormalizedTable,
        codes: &HashSet<&str>,
        mode: MatchMode,
    ) -> Option<ColumnMatch> {
        if codes.is_empty() {
            trace!("no candidate codes, skipping table");
            return None;
        }

        (0..table.column_count())
            .filter_map(|index| self.score_column(table, index, codes, mode))
            .inspect(|hit| {
                debug!(
                    column = %hit.column,
                    matched = hit.matched,
                    total = hit.total,
                    ?mode,
                    "scored candidate column"
                )
            })
            .find(|hit| hit.ratio() >= self.threshold)
    }

    /// Whether any column of the table is a P-code column.
    pub fn is_pcoded(&self, table: &NormalizedTable, codes: &HashSet<&str>, mode: MatchMode) -> bool {
        self.find(table, codes, mode).is_some()
    }
}

/// Upper-case a value, drop nulls, and strip zeros in mis-code mode.
fn prepare_value(value: &str, mode: MatchMode) -> Option<String> {
    let value = value.trim().to_uppercase();
    if NULL_TOKENS.contains(&value.as_str()) {
        return None;
    }
    match mode {
        MatchMode::Codes => Some(value),
        MatchMode::Miscodes => Some(value.replace('0', "")),
    }
}
