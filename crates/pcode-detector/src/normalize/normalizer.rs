//! Header recovery for messy tabular samples.
//!
//! Real-world sheets often carry a row of `#` machine tags above or below
//! the visible header, or no header at all. The normalizer walks a small
//! state machine to recover one descriptive key per column:
//!
//! 1. drop empty rows and columns
//! 2. promote the first row when every header is a placeholder
//! 3. bail out for typed or single-row tables
//! 4. seek a tag row in the first rows
//! 5. fold the header rows into composite keys

use std::collections::HashSet;

use tracing::debug;

use crate::input::{RawFragment, SchemaHint, is_empty_cell, is_placeholder, placeholder_name};

use super::table::{BailOut, COMPOSITE_SEPARATOR, HeaderLayout, NormalizedTable};

/// Rows scanned when looking for a tag row.
pub const TAG_SCAN_ROWS: usize = 10;

/// Header depth assumed for non-delimited input without a tag row.
pub const FALLBACK_HEADER_DEPTH: usize = 3;

/// Marker that starts a machine-readable tag.
const TAG_MARKER: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Cleaning,
    PromotingPlaceholderHeader,
    CheckingBailOut,
    SeekingTagRow,
    BuildingCompositeKeys { depth: usize, layout: HeaderLayout },
    Done(HeaderLayout),
}

/// Recovers stable column keys from raw fragments.
#[derive(Debug, Clone)]
pub struct Normalizer {
    tag_scan_rows: usize,
    fallback_depth: usize,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            tag_scan_rows: TAG_SCAN_ROWS,
            fallback_depth: FALLBACK_HEADER_DEPTH,
        }
    }

    /// Override the tag-row scan window.
    pub fn with_tag_scan_rows(mut self, rows: usize) -> Self {
        self.tag_scan_rows = rows;
        self
    }

    /// Override the fallback header depth.
    pub fn with_fallback_depth(mut self, depth: usize) -> Self {
        self.fallback_depth = depth;
        self
    }

    /// Normalize one fragment.
    pub fn normalize(&self, fragment: RawFragment) -> NormalizedTable {
        let label = fragment.label();
        let RawFragment {
            columns,
            rows,
            format,
            schema,
            ..
        } = fragment;

        let mut columns = columns;
        let mut rows = rows;
        let mut promoted_header = false;
        let mut stage = Stage::Cleaning;

        loop {
            stage = match stage {
                Stage::Cleaning => {
                    drop_empty(&mut columns, &mut rows);
                    Stage::PromotingPlaceholderHeader
                }
                Stage::PromotingPlaceholderHeader => {
                    if !rows.is_empty() && !columns.is_empty() && columns.iter().all(|c| is_placeholder(c)) {
                        let first = rows.remove(0);
                        columns = first
                            .into_iter()
                            .enumerate()
                            .map(|(i, value)| {
                                let value = value.trim();
                                if value.is_empty() {
                                    placeholder_name(i)
                                } else {
                                    value.to_string()
                                }
                            })
                            .collect();
                        promoted_header = true;
                    }
                    Stage::CheckingBailOut
                }
                Stage::CheckingBailOut => {
                    if schema == SchemaHint::Inferred {
                        Stage::Done(HeaderLayout::BailedOut {
                            reason: BailOut::SchemaInferred,
                        })
                    } else if rows.len() <= 1 {
                        Stage::Done(HeaderLayout::BailedOut {
                            reason: BailOut::TooFewRows,
                        })
                    } else {
                        Stage::SeekingTagRow
                    }
                }
                Stage::SeekingTagRow => match find_tag_row(&rows, self.tag_scan_rows) {
                    Some(row) => Stage::BuildingCompositeKeys {
                        depth: row + 1,
                        layout: HeaderLayout::TagRow { row },
                    },
                    None if format.is_delimited() => Stage::Done(HeaderLayout::AsRead),
                    None => {
                        let depth = self.fallback_depth.min(rows.len());
                        Stage::BuildingCompositeKeys {
                            depth,
                            layout: HeaderLayout::FixedDepth { depth },
                        }
                    }
                },
                Stage::BuildingCompositeKeys { depth, layout } => {
                    columns = composite_keys(&columns, &rows[..depth]);
                    rows = rows.split_off(depth);
                    Stage::Done(layout)
                }
                Stage::Done(layout) => {
                    dedupe_keys(&mut columns);
                    debug!(
                        fragment = %label,
                        ?layout,
                        promoted_header,
                        columns = columns.len(),
                        rows = rows.len(),
                        "normalized fragment"
                    );
                    return NormalizedTable {
                        columns,
                        rows,
                        layout,
                        promoted_header,
                    };
                }
            };
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop rows with no values, then columns with no values.
fn drop_empty(columns: &mut Vec<String>, rows: &mut Vec<Vec<String>>) {
    rows.retain(|row| !row.iter().all(|cell| is_empty_cell(cell)));
    if rows.is_empty() {
        return;
    }

    let keep: Vec<bool> = (0..columns.len())
        .map(|col| {
            rows.iter()
                .any(|row| row.get(col).is_some_and(|cell| !is_empty_cell(cell)))
        })
        .collect();

    if keep.iter().all(|&k| k) {
        return;
    }

    let mut col = 0;
    columns.retain(|_| {
        let kept = keep[col];
        col += 1;
        kept
    });
    for row in rows.iter_mut() {
        let mut col = 0;
        row.retain(|_| {
            let kept = keep.get(col).copied().unwrap_or(false);
            col += 1;
            kept
        });
    }
}

/// Whether a cell is a machine tag.
fn is_tag(cell: &str) -> bool {
    cell.trim_start().starts_with(TAG_MARKER)
}

/// First row within the scan window whose populated cells are all tags.
fn find_tag_row(rows: &[Vec<String>], scan: usize) -> Option<usize> {
    rows.iter().take(scan).position(|row| {
        row.iter().any(|cell| is_tag(cell))
            && row.iter().all(|cell| is_empty_cell(cell) || is_tag(cell))
    })
}

/// Join each header (unless a placeholder) with the populated header-row values beneath it.
fn composite_keys(columns: &[String], header_rows: &[Vec<String>]) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(col, key)| {
            let mut parts: Vec<&str> = Vec::with_capacity(header_rows.len() + 1);
            if !is_placeholder(key) {
                parts.push(key.as_str());
            }
            parts.extend(
                header_rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.trim())
                    .filter(|cell| !cell.is_empty()),
            );
            if parts.is_empty() {
                key.clone()
            } else {
                parts.join(COMPOSITE_SEPARATOR)
            }
        })
        .collect()
}

/// Make keys unique by suffixing repeats with `.1`, `.2`, ...
fn dedupe_keys(columns: &mut [String]) {
    let mut seen: HashSet<String> = HashSet::with_capacity(columns.len());
    for key in columns.iter_mut() {
        if seen.insert(key.clone()) {
            continue;
        }
        let mut n = 1;
        let mut candidate = format!("{}.{}", key, n);
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{}.{}", key, n);
        }
        seen.insert(candidate.clone());
        *key = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FileFormat;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn fragment(columns: &[&str], rows: &[&[&str]], format: FileFormat) -> RawFragment {
        RawFragment::new(
            strings(columns),
            rows.iter().map(|r| strings(r)).collect(),
            format,
        )
    }

    #[test]
    fn test_drop_empty_rows_and_columns() {
        let raw = fragment(
            &["code", "blank", "name"],
            &[&["AF01", "", "Kabul"], &["", "", ""], &["AF02", " ", "Herat"]],
            FileFormat::Csv,
        );
        let table = Normalizer::new().normalize(raw);
        assert_eq!(table.columns, vec!["code", "name"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.layout, HeaderLayout::AsRead);
    }

    #[test]
    fn test_promotes_placeholder_header() {
        let raw = fragment(
            &["Unnamed: 0", "Unnamed: 1"],
            &[&["pcode", ""], &["AF01", "Kabul"], &["AF02", "Herat"]],
            FileFormat::Csv,
        );
        let table = Normalizer::new().normalize(raw);
        assert!(table.promoted_header);
        assert_eq!(table.columns, vec!["pcode", "Unnamed: 1"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_tag_row_folds_into_keys() {
        let raw = fragment(
            &["Admin 1", "Unnamed: 1"],
            &[&["#adm1+pcode", "#adm1+name"], &["AF01", "Kabul"], &["AF02", "Herat"]],
            FileFormat::Xlsx,
        );
        let table = Normalizer::new().normalize(raw);
        assert_eq!(table.layout, HeaderLayout::TagRow { row: 0 });
        assert_eq!(table.columns, vec!["Admin 1||#adm1+pcode", "#adm1+name"]);
        assert_eq!(table.rows, vec![strings(&["AF01", "Kabul"]), strings(&["AF02", "Herat"])]);
    }

    #[test]
    fn test_tag_row_below_second_header() {
        let raw = fragment(
            &["Location", "Value"],
            &[
                &["Province code", "People"],
                &["#adm1+code", ""],
                &["AF01", "10"],
                &["AF02", "12"],
            ],
            FileFormat::Csv,
        );
        let table = Normalizer::new().normalize(raw);
        assert_eq!(table.layout, HeaderLayout::TagRow { row: 1 });
        assert_eq!(table.columns, vec!["Location||Province code||#adm1+code", "Value||People"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_csv_without_tags_keeps_header() {
        let raw = fragment(&["pcode", "name"], &[&["AF01", "Kabul"], &["AF02", "Herat"]], FileFormat::Csv);
        let table = Normalizer::new().normalize(raw.clone());
        assert_eq!(table.columns, raw.columns);
        assert_eq!(table.rows, raw.rows);
    }

    #[test]
    fn test_spreadsheet_fallback_depth() {
        let raw = fragment(
            &["Admin", "Unnamed: 1"],
            &[
                &["Level 1", "Level 1"],
                &["code", "name"],
                &["", "(en)"],
                &["AF01", "Kabul"],
                &["AF02", "Herat"],
            ],
            FileFormat::Xlsx,
        );
        let table = Normalizer::new().normalize(raw);
        assert_eq!(table.layout, HeaderLayout::FixedDepth { depth: 3 });
        assert_eq!(table.columns, vec!["Admin||Level 1||code", "Level 1||name||(en)"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_fallback_depth_capped_by_rows() {
        let raw = fragment(&["a", "b"], &[&["x", "y"], &["1", "2"]], FileFormat::Xls);
        let table = Normalizer::new().normalize(raw);
        assert_eq!(table.layout, HeaderLayout::FixedDepth { depth: 2 });
        assert_eq!(table.columns, vec!["a||x||1", "b||y||2"]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_inferred_schema_bails_out() {
        let raw = fragment(&["a", "b"], &[&["#x", "#y"], &["1", "2"]], FileFormat::GeoJson)
            .with_schema(SchemaHint::Inferred);
        let table = Normalizer::new().normalize(raw);
        assert_eq!(
            table.layout,
            HeaderLayout::BailedOut {
                reason: BailOut::SchemaInferred
            }
        );
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_single_row_bails_out() {
        let raw = fragment(&["a"], &[&["#x"]], FileFormat::Xlsx);
        let table = Normalizer::new().normalize(raw);
        assert_eq!(
            table.layout,
            HeaderLayout::BailedOut {
                reason: BailOut::TooFewRows
            }
        );
    }

    #[test]
    fn test_tag_row_outside_scan_window() {
        let mut rows: Vec<&[&str]> = Vec::new();
        for _ in 0..3 {
            rows.push(&["AF01"]);
        }
        rows.push(&["#adm1+code"]);
        rows.push(&["AF02"]);
        let raw = fragment(&["code"], &rows, FileFormat::Csv);

        let table = Normalizer::new().with_tag_scan_rows(2).normalize(raw);
        assert_eq!(table.layout, HeaderLayout::AsRead);
        assert_eq!(table.row_count(), 5);
    }

    #[test]
    fn test_duplicate_keys_are_disambiguated() {
        let mut columns = strings(&["code", "code", "code.1"]);
        dedupe_keys(&mut columns);
        assert_eq!(columns, vec!["code", "code.1", "code.1.1"]);

        let raw = fragment(
            &["Unnamed: 0", "Unnamed: 1", "Unnamed: 2"],
            &[&["name", "name", "pcode"], &["a", "b", "AF01"], &["c", "d", "AF02"]],
            FileFormat::Csv,
        );
        let table = Normalizer::new().normalize(raw);
        assert_eq!(table.columns, vec!["name", "name.1", "pcode"]);
    }
}
