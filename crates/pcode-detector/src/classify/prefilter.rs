//! Checks that reject a resource before any data is read.

use tracing::{debug, warn};

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::input::{Dataset, Resource};

use super::verdict::SkipReason;

/// Looks up the size of a remote resource without downloading it.
pub trait SizeProbe {
    /// Declared content length, or `None` when the server does not say.
    fn content_length(&self, url: &str) -> Result<Option<u64>>;
}

/// Probes sizes with an HTTP HEAD request.
pub struct HttpSizeProbe {
    client: reqwest::blocking::Client,
}

impl HttpSizeProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpSizeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeProbe for HttpSizeProbe {
    fn content_length(&self, url: &str) -> Result<Option<u64>> {
        let response = self.client.head(url).send()?.error_for_status()?;
        let length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        Ok(length)
    }
}

/// A probe that never answers; API resources without a declared size are
/// then always treated as too large.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl SizeProbe for NoProbe {
    fn content_length(&self, _url: &str) -> Result<Option<u64>> {
        Ok(None)
    }
}

/// Applies organization, file type, and size pre-filters.
pub struct PreFilter<'a> {
    config: &'a DetectorConfig,
}

impl<'a> PreFilter<'a> {
    pub fn new(config: &'a DetectorConfig) -> Self {
        Self { config }
    }

    /// Reason to skip the resource, or `None` if it should be read.
    pub fn check(&self, dataset: &Dataset, resource: &Resource, probe: &dyn SizeProbe) -> Option<SkipReason> {
        if self.config.is_org_exception(&dataset.organization) {
            return Some(SkipReason::OrgException {
                organization: dataset.organization.clone(),
            });
        }

        if !self.config.is_allowed_filetype(&resource.format) {
            return Some(SkipReason::DisallowedFiletype {
                filetype: resource.format.clone(),
            });
        }

        let size = self.resource_size(resource, probe);
        match size {
            Some(size) if size >= self.config.resource_size => Some(SkipReason::TooLarge { size: Some(size) }),
            None if resource.is_api() => Some(SkipReason::TooLarge { size: None }),
            _ => None,
        }
    }

    /// Declared size, probing API resources that declare none.
    ///
    /// A failed or empty probe yields the ceiling so the resource is skipped.
    fn resource_size(&self, resource: &Resource, probe: &dyn SizeProbe) -> Option<u64> {
        if let Some(size) = resource.declared_size() {
            return Some(size);
        }
        if !resource.is_api() {
            return None;
        }

        match probe.content_length(&resource.url) {
            Ok(Some(size)) => {
                debug!(resource = %resource.name, size, "probed resource size");
                Some(size)
            }
            Ok(None) => Some(self.config.resource_size),
            Err(e) => {
                warn!(resource = %resource.name, error = %e, "size probe failed");
                Some(self.config.resource_size)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectorError;

    struct FixedProbe(Option<u64>);

    impl SizeProbe for FixedProbe {
        fn content_length(&self, _url: &str) -> Result<Option<u64>> {
            Ok(self.0)
        }
    }

    struct FailingProbe;

    impl SizeProbe for FailingProbe {
        fn content_length(&self, _url: &str) -> Result<Option<u64>> {
            Err(DetectorError::Acquisition("connection refused".to_string()))
        }
    }

    fn config() -> DetectorConfig {
        DetectorConfig {
            resource_size: 1000,
            org_exceptions: vec!["hot".to_string()],
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn test_org_exception() {
        let config = config();
        let dataset = Dataset::new("roads").with_organization("hot");
        let resource = Resource::new("roads.csv", "roads.csv", "csv");
        let reason = PreFilter::new(&config).check(&dataset, &resource, &NoProbe);
        assert!(matches!(reason, Some(SkipReason::OrgException { .. })));
    }

    #[test]
    fn test_filetype_allow_list() {
        let config = config();
        let dataset = Dataset::new("d");
        let pdf = Resource::new("report", "report.pdf", "PDF");
        let csv = Resource::new("data", "data.csv", "CSV").with_size(10);
        let filter = PreFilter::new(&config);
        assert!(matches!(
            filter.check(&dataset, &pdf, &NoProbe),
            Some(SkipReason::DisallowedFiletype { .. })
        ));
        assert_eq!(filter.check(&dataset, &csv, &NoProbe), None);
    }

    #[test]
    fn test_size_ceiling_is_inclusive() {
        let config = config();
        let dataset = Dataset::new("d");
        let filter = PreFilter::new(&config);
        let at = Resource::new("a", "a.csv", "csv").with_size(1000);
        let under = Resource::new("b", "b.csv", "csv").with_size(999);
        assert!(filter.check(&dataset, &at, &NoProbe).is_some());
        assert!(filter.check(&dataset, &under, &NoProbe).is_none());
    }

    #[test]
    fn test_api_probe() {
        let config = config();
        let dataset = Dataset::new("d");
        let filter = PreFilter::new(&config);
        let api = Resource::new("api", "https://example.org/api", "json").with_resource_type("api");

        assert!(filter.check(&dataset, &api, &FixedProbe(Some(10))).is_none());
        assert!(filter.check(&dataset, &api, &FixedProbe(Some(5000))).is_some());
        assert!(filter.check(&dataset, &api, &FixedProbe(None)).is_some());
        assert!(filter.check(&dataset, &api, &FailingProbe).is_some());
    }

    #[test]
    fn test_undeclared_size_file_is_read() {
        let config = config();
        let resource = Resource::new("a", "a.csv", "csv");
        assert!(PreFilter::new(&config)
            .check(&Dataset::new("d"), &resource, &FailingProbe)
            .is_none());
    }
}
