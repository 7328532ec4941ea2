//! Fuzz target for the normalizer and matchers.
//!
//! Arbitrary ragged tables must never panic and must always normalize to
//! unique keys over rectangular rows.

#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pcode_detector::input::SchemaHint;
use pcode_detector::{FileFormat, LatLongMatcher, MatchMode, Normalizer, PcodeMatcher, RawFragment};

#[derive(Debug, Arbitrary)]
struct Input {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    spreadsheet: bool,
    inferred: bool,
}

fuzz_target!(|input: Input| {
    if input.rows.len() > 500 || input.columns.len() > 100 {
        return;
    }

    let format = if input.spreadsheet { FileFormat::Xlsx } else { FileFormat::Csv };
    let schema = if input.inferred { SchemaHint::Inferred } else { SchemaHint::Untyped };
    let fragment = RawFragment::new(input.columns, input.rows, format).with_schema(schema);

    let table = Normalizer::new().normalize(fragment);

    let unique: HashSet<&String> = table.columns.iter().collect();
    assert_eq!(unique.len(), table.columns.len());
    assert!(table.rows.iter().all(|row| row.len() == table.columns.len()));

    let codes: HashSet<&str> = ["AF01", "AF02", "AF0101"].into_iter().collect();
    let _ = PcodeMatcher::new().is_pcoded(&table, &codes, MatchMode::Codes);
    let _ = PcodeMatcher::new().is_pcoded(&table, &codes, MatchMode::Miscodes);
    let _ = LatLongMatcher::new().is_latlong(&table);
});
