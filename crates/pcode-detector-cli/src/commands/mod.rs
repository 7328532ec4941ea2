//! CLI command implementations.

pub mod codes;
pub mod inspect;
pub mod run;

use std::path::{Path, PathBuf};

use pcode_detector::{CodeIndexBuilder, CsvReferenceSource, DetectorConfig, ReferenceCodes, ReferenceSource};

/// Load the project configuration, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> pcode_detector::Result<DetectorConfig> {
    match path {
        Some(path) => DetectorConfig::load(path),
        None => Ok(DetectorConfig::default()),
    }
}

/// Reference source from `--reference`, falling back to the configuration.
pub fn reference_source(
    config: &DetectorConfig,
    reference: Option<PathBuf>,
) -> pcode_detector::Result<CsvReferenceSource> {
    let mut reference_config = config.reference.clone();
    if let Some(path) = reference {
        reference_config.path = Some(path);
    }
    CsvReferenceSource::from_config(&reference_config)
}

/// Build the indices for the given locations (all scopes when empty).
pub fn build_reference(
    source: &dyn ReferenceSource,
    locations: &[String],
) -> pcode_detector::Result<ReferenceCodes> {
    let records = source.records()?;
    Ok(CodeIndexBuilder::new()
        .with_locations(locations.iter().map(|l| l.trim().to_uppercase()))
        .build(records))
}
