//! Fuzz target for the fragment reader.
//!
//! The delimited, JSON, TopoJSON and workbook readers must never panic on
//! malformed input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pcode_detector::{FileFormat, FragmentReader};
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let reader = FragmentReader::new();
    let _ = reader.read_delimited(data);
    let _ = reader.read_json(data);
    let _ = reader.read_topojson(data);

    if let Ok(mut temp_file) = tempfile::NamedTempFile::with_suffix(".xlsx") {
        if temp_file.write_all(data).is_ok() {
            let _ = reader.read_path(temp_file.path(), &FileFormat::Xlsx);
        }
    }
});
