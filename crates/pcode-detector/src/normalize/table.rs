//! Normalized tables with stable, unique column keys.

use serde::{Deserialize, Serialize};

use crate::input::{FileFormat, RawFragment, SchemaHint};

/// Separator joining header fragments into a composite column key.
pub const COMPOSITE_SEPARATOR: &str = "||";

/// Why the normalizer returned a table without locating header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BailOut {
    /// The reader already inferred a schema.
    SchemaInferred,
    /// One data row or fewer remained.
    TooFewRows,
}

/// How the column keys of a normalized table were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum HeaderLayout {
    /// The header row as read was kept.
    AsRead,
    /// Returned early without looking for header rows.
    BailedOut { reason: BailOut },
    /// A tag row was found at `row`; rows `0..=row` were folded into the keys.
    TagRow { row: usize },
    /// No tag row; the first `depth` rows were folded into the keys.
    FixedDepth { depth: usize },
}

/// A fragment after header recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    /// Unique column keys, possibly composite.
    pub columns: Vec<String>,
    /// Data rows beneath the consumed header rows.
    pub rows: Vec<Vec<String>>,
    /// Path the normalizer took.
    pub layout: HeaderLayout,
    /// Whether the header row was promoted from the first data row.
    pub promoted_header: bool,
}

impl NormalizedTable {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a column by key.
    pub fn column_by_key(&self, key: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c == key)?;
        Some(self.column_values(index).collect())
    }

    /// The header fragments a column key was built from.
    pub fn key_fragments(&self, index: usize) -> impl Iterator<Item = &str> {
        self.columns
            .get(index)
            .map(|key| key.as_str())
            .unwrap_or("")
            .split(COMPOSITE_SEPARATOR)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Turn the table back into an untyped fragment.
    pub fn into_fragment(self, format: FileFormat) -> RawFragment {
        RawFragment::new(self.columns, self.rows, format).with_schema(SchemaHint::Untyped)
    }
}
