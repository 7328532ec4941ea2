//! One report row per classified resource.

use serde::{Deserialize, Serialize};

use crate::classify::{ResourceVerdict, Verdict};
use crate::input::{Dataset, Resource};

/// Report row: identifiers, both verdicts, and the error, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub dataset_name: String,
    pub dataset_title: String,
    pub resource_name: String,
    pub pcoded: Verdict,
    pub secondary: Verdict,
    pub error: Option<String>,
}

impl ReportRow {
    pub fn new(dataset: &Dataset, resource: &Resource, verdict: &ResourceVerdict) -> Self {
        Self {
            dataset_name: dataset.name.clone(),
            dataset_title: dataset.title.clone(),
            resource_name: resource.name.clone(),
            pcoded: verdict.pcoded,
            secondary: verdict.secondary,
            error: verdict.error.clone(),
        }
    }

    /// Fields in report column order.
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.dataset_name,
            &self.dataset_title,
            &self.resource_name,
            self.pcoded.label(),
            self.secondary.label(),
            self.error.as_deref().unwrap_or(""),
        ]
    }
}
