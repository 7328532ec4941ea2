//! Project configuration loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Result};

/// Default size ceiling: resources at or above 1 GiB are not downloaded.
pub const DEFAULT_RESOURCE_SIZE: u64 = 1024 * 1024 * 1024;

/// Default per-fragment row cap.
pub const DEFAULT_SAMPLE_ROWS: usize = 200;

/// Which secondary matcher runs when a resource is not P-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryCheck {
    /// Look for P-codes written in a nonstandard variant spelling.
    #[default]
    Miscoded,
    /// Look for a latitude/longitude column pair.
    LatLong,
}

impl SecondaryCheck {
    /// Column label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            SecondaryCheck::Miscoded => "mis_pcoded",
            SecondaryCheck::LatLong => "latlong",
        }
    }
}

impl std::str::FromStr for SecondaryCheck {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "miscoded" | "mis_pcoded" | "miscodes" => Ok(SecondaryCheck::Miscoded),
            "latlong" | "lat_long" | "latlon" => Ok(SecondaryCheck::LatLong),
            _ => Err(format!("Unknown secondary check: {}. Use miscoded or latlong.", s)),
        }
    }
}

impl std::fmt::Display for SecondaryCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecondaryCheck::Miscoded => write!(f, "miscoded"),
            SecondaryCheck::LatLong => write!(f, "latlong"),
        }
    }
}

/// Where the global reference code table lives and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Path to the reference CSV.
    pub path: Option<PathBuf>,
    /// Column holding the code.
    pub code_column: String,
    /// Column holding the ISO3 location scope.
    pub scope_column: String,
    /// Column holding the admin level.
    pub level_column: String,
    /// Only index codes for these scopes (empty = all).
    pub locations: Vec<String>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: None,
            code_column: "P-Code".to_string(),
            scope_column: "Location".to_string(),
            level_column: "Admin Level".to_string(),
            locations: Vec::new(),
        }
    }
}

/// Configuration for a detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Size ceiling in bytes; larger resources are not checked.
    pub resource_size: u64,
    /// Maximum data rows read per fragment.
    pub sample_rows: usize,
    /// Organizations whose datasets are never checked.
    pub org_exceptions: Vec<String>,
    /// Catalog file types that are checked (case-insensitive).
    pub allowed_filetypes: Vec<String>,
    /// Secondary signal to look for.
    pub secondary: SecondaryCheck,
    /// Global reference code table.
    pub reference: ReferenceConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            resource_size: DEFAULT_RESOURCE_SIZE,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            org_exceptions: Vec::new(),
            allowed_filetypes: [
                "csv",
                "xlsx",
                "xls",
                "json",
                "geojson",
                "topojson",
                "shp",
                "zipped shapefile",
                "geodatabase",
                "geopackage",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            secondary: SecondaryCheck::default(),
            reference: ReferenceConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| DetectorError::io(path, e))?;
        let mut config = Self::from_toml_str(&contents)?;

        // Relative reference paths resolve against the config file's directory
        if let (Some(reference), Some(parent)) = (config.reference.path.as_ref(), path.parent()) {
            if reference.is_relative() {
                config.reference.path = Some(parent.join(reference));
            }
        }

        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DetectorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every resource uncheckable.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rows == 0 {
            return Err(DetectorError::Config(
                "sample_rows must be greater than zero".to_string(),
            ));
        }
        if self.resource_size == 0 {
            return Err(DetectorError::Config(
                "resource_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a catalog file type is on the allow list.
    pub fn is_allowed_filetype(&self, filetype: &str) -> bool {
        let filetype = filetype.trim();
        self.allowed_filetypes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(filetype))
    }

    /// Whether an organization is exempt from checking.
    pub fn is_org_exception(&self, organization: &str) -> bool {
        self.org_exceptions.iter().any(|org| org == organization)
    }
}
