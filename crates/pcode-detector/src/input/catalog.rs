//! Catalog descriptors for datasets and their resources.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Result};

use super::fragment::FileFormat;

/// Resource type the catalog reports for live API endpoints.
pub const API_RESOURCE_TYPE: &str = "api";

/// One downloadable resource of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Download URL or local path.
    pub url: String,
    /// Catalog file type (e.g. "csv", "Geodatabase", "zipped shapefile").
    pub format: String,
    /// Declared size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Catalog resource type ("file.upload", "api", ...).
    #[serde(default)]
    pub resource_type: Option<String>,
}

impl Resource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, format: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            url: url.into(),
            format: format.into(),
            size: None,
            resource_type: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Format to fetch the resource as.
    pub fn file_format(&self) -> FileFormat {
        FileFormat::from_filetype(&self.format)
    }

    /// Whether the catalog marks this resource as a live API.
    pub fn is_api(&self) -> bool {
        self.resource_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(API_RESOURCE_TYPE))
    }

    /// Declared size, treating zero as undeclared.
    pub fn declared_size(&self) -> Option<u64> {
        self.size.filter(|&size| size > 0)
    }
}

/// A catalog dataset with its declared locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Owning organization name.
    #[serde(default)]
    pub organization: String,
    /// Declared ISO3 location scopes.
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            organization: String::new(),
            locations: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_locations(mut self, locations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Load a JSON manifest: an array of datasets.
    pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<Dataset>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DetectorError::io(path, e))?;
        let datasets = serde_json::from_reader(BufReader::new(file))?;
        Ok(datasets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json() {
        let json = r#"[{
            "name": "afg-admin",
            "title": "Afghanistan admin boundaries",
            "organization": "ocha-afg",
            "locations": ["AFG"],
            "resources": [
                {"name": "adm1.csv", "url": "data/adm1.csv", "format": "CSV", "size": 1024},
                {"name": "api", "url": "https://example.org/api", "format": "json", "resource_type": "api"}
            ]
        }]"#;
        let datasets: Vec<Dataset> = serde_json::from_str(json).unwrap();

        assert_eq!(datasets[0].locations, vec!["AFG"]);
        assert_eq!(datasets[0].resources[0].file_format(), FileFormat::Csv);
        assert_eq!(datasets[0].resources[0].declared_size(), Some(1024));
        assert!(datasets[0].resources[1].is_api());
        assert_eq!(datasets[0].resources[1].declared_size(), None);
    }

    #[test]
    fn test_zero_size_is_undeclared() {
        let resource = Resource::new("r", "u", "csv").with_size(0);
        assert_eq!(resource.declared_size(), None);
    }
}
