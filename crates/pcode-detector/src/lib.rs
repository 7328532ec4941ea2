//! pcode-detector: location-coding triage for humanitarian tabular datasets.
//!
//! Given catalog resources and a reference table of administrative P-codes,
//! the detector decides per resource whether it is P-coded, whether it is
//! probably P-coded with nonstandard ("mis-coded") codes, or whether it
//! carries a latitude/longitude column pair instead.
//!
//! # Pipeline
//!
//! - **Reference**: build code and mis-coding indices once per run
//! - **Input**: acquire a resource and read a bounded sample of fragments
//! - **Normalize**: recover column keys from messy headers and tag rows
//! - **Match**: score columns against candidate codes or coordinate patterns
//! - **Classify**: combine fragment results into tri-state verdicts
//!
//! # Example
//!
//! ```no_run
//! use pcode_detector::{
//!     CsvReferenceSource, Dataset, Detector, DetectorConfig, FileAcquirer, HttpSizeProbe,
//!     MemorySink,
//! };
//!
//! let config = DetectorConfig::load("project.toml").unwrap();
//! let source = CsvReferenceSource::from_config(&config.reference).unwrap();
//! let detector = Detector::new(config, &source).unwrap();
//!
//! let datasets = Dataset::load_manifest("datasets.json").unwrap();
//! let mut sink = MemorySink::new();
//! let summary = detector
//!     .run(&datasets, &FileAcquirer::default(), &HttpSizeProbe::new(), &mut sink)
//!     .unwrap();
//!
//! println!("P-coded resources: {}", summary.pcoded);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod input;
pub mod matching;
pub mod normalize;
pub mod reference;
pub mod report;

mod detector;

pub use classify::{Classifier, HttpSizeProbe, ResourceVerdict, SizeProbe, Verdict};
pub use config::{DetectorConfig, ReferenceConfig, SecondaryCheck};
pub use detector::{BatchSummary, Detector};
pub use error::{DetectorError, Result};
pub use input::{DataAcquirer, Dataset, FileAcquirer, FileFormat, FragmentReader, RawFragment, Resource};
pub use matching::{LatLongMatcher, MatchMode, PcodeMatcher};
pub use normalize::{NormalizedTable, Normalizer};
pub use reference::{CodeIndex, CodeIndexBuilder, CodeRecord, CsvReferenceSource, ReferenceCodes, ReferenceSource};
pub use report::{CsvReportSink, MemorySink, ReportRow, ResultSink};
