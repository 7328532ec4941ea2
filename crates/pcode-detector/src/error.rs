//! Error types for the detector library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for detector operations.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML configuration.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP download or probe failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Zip or gzip archive could not be opened or extracted.
    #[error("Unable to unzip resource: {0}")]
    Archive(String),

    /// GeoPackage database could not be queried.
    #[error("GeoPackage error: {0}")]
    Geopackage(#[from] rusqlite::Error),

    /// Shapefile attribute table could not be read.
    #[error("Shapefile error: {0}")]
    Shapefile(String),

    /// Spreadsheet workbook could not be opened or a sheet could not be read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// File format not supported by the fragment reader.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to classify.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Resource could not be downloaded or extracted.
    #[error("Acquisition failed: {0}")]
    Acquisition(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DetectorError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DetectorError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for detector operations.
pub type Result<T> = std::result::Result<T, DetectorError>;
