//! Per-resource classification.
//!
//! A resource moves through pre-filtering, acquisition, normalization and the
//! matchers. The P-code verdict short-circuits the secondary check, and a
//! `Detected` verdict is never downgraded by a later read error.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{DetectorConfig, SecondaryCheck};
use crate::input::{DataAcquirer, Dataset, RawFragment, Resource};
use crate::matching::{ColumnMatch, CoordinatePair, LatLongMatcher, MatchMode, PcodeMatcher};
use crate::normalize::{HeaderLayout, NormalizedTable, Normalizer};
use crate::reference::ReferenceCodes;

use super::prefilter::{PreFilter, SizeProbe};
use super::verdict::{Evidence, ResourceVerdict, Verdict};

/// Candidate code sets for one dataset's declared locations.
pub struct Candidates<'a> {
    pub codes: HashSet<&'a str>,
    pub miscodes: HashSet<&'a str>,
}

/// What every matcher found in one normalized table.
#[derive(Debug, Clone, Serialize)]
pub struct TableFindings {
    pub fragment: String,
    pub layout: HeaderLayout,
    pub columns: Vec<String>,
    pub rows: usize,
    pub pcode: Option<ColumnMatch>,
    pub miscode: Option<ColumnMatch>,
    pub latlong: Option<CoordinatePair>,
}

/// Classifies resources against a fixed set of reference codes.
pub struct Classifier<'a> {
    config: &'a DetectorConfig,
    reference: &'a ReferenceCodes,
    normalizer: Normalizer,
    pcode: PcodeMatcher,
    latlong: LatLongMatcher,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a DetectorConfig, reference: &'a ReferenceCodes) -> Self {
        Self {
            config,
            reference,
            normalizer: Normalizer::new(),
            pcode: PcodeMatcher::new(),
            latlong: LatLongMatcher::new(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_pcode_matcher(mut self, matcher: PcodeMatcher) -> Self {
        self.pcode = matcher;
        self
    }

    pub fn with_latlong_matcher(mut self, matcher: LatLongMatcher) -> Self {
        self.latlong = matcher;
        self
    }

    /// Code and mis-code candidates for the given locations.
    pub fn candidates(&self, locations: &[String]) -> Candidates<'a> {
        Candidates {
            codes: self.reference.codes.candidates(locations),
            miscodes: self.reference.miscodes.candidates(locations),
        }
    }

    /// Classify one resource end to end.
    pub fn classify(
        &self,
        dataset: &Dataset,
        resource: &Resource,
        acquirer: &dyn DataAcquirer,
        probe: &dyn SizeProbe,
    ) -> ResourceVerdict {
        if let Some(reason) = PreFilter::new(self.config).check(dataset, resource, probe) {
            info!(dataset = %dataset.name, resource = %resource.name, %reason, "skipping resource");
            return ResourceVerdict::skipped(reason);
        }

        let acquired = match acquirer.acquire(resource, &resource.file_format()) {
            Ok(acquired) => acquired,
            Err(e) => {
                error!(dataset = %dataset.name, resource = %resource.name, error = %e, "acquisition failed");
                return ResourceVerdict::failed(e.to_string());
            }
        };

        let verdict = self.classify_fragments(&dataset.locations, acquired.fragments, acquired.read_error);
        self.log_verdict(dataset, resource, &verdict);
        verdict
    }

    /// Classify fragments already read from a resource.
    ///
    /// `read_error` is a failure from reading some of the resource's files.
    /// With no fragments the result is `Unknown` with an error.
    pub fn classify_fragments(
        &self,
        locations: &[String],
        fragments: Vec<RawFragment>,
        read_error: Option<String>,
    ) -> ResourceVerdict {
        if fragments.is_empty() {
            return ResourceVerdict::failed(
                read_error.unwrap_or_else(|| "Unable to read resource: no readable data".to_string()),
            );
        }

        let tables: Vec<(String, NormalizedTable)> = fragments
            .into_iter()
            .map(|fragment| {
                let label = fragment.label();
                (label, self.normalizer.normalize(fragment))
            })
            .collect();

        let candidates = self.candidates(locations);
        let mut verdict = ResourceVerdict {
            error: read_error,
            ..ResourceVerdict::default()
        };

        if let Some(evidence) = self.first_pcode_hit(&tables, &candidates) {
            verdict.pcoded = Verdict::Detected;
            verdict.evidence = Some(evidence);
            return verdict;
        }

        let secondary = self.first_secondary_hit(&tables, &candidates);
        let checked_cleanly = verdict.error.is_none();
        verdict.secondary = match secondary {
            Some(_) => Verdict::Detected,
            None if checked_cleanly => Verdict::NotDetected,
            None => Verdict::Unknown,
        };
        verdict.evidence = secondary;
        if checked_cleanly {
            verdict.pcoded = verdict.pcoded.settle();
        }
        verdict
    }

    /// Run every matcher on one table, without short-circuiting.
    pub fn examine(&self, fragment: RawFragment, locations: &[String]) -> TableFindings {
        let label = fragment.label();
        let table = self.normalizer.normalize(fragment);
        let candidates = self.candidates(locations);

        TableFindings {
            fragment: label,
            layout: table.layout,
            columns: table.columns.clone(),
            rows: table.row_count(),
            pcode: self.pcode.find(&table, &candidates.codes, MatchMode::Codes),
            miscode: self.pcode.find(&table, &candidates.miscodes, MatchMode::Miscodes),
            latlong: self.latlong.find(&table),
        }
    }

    fn first_pcode_hit(&self, tables: &[(String, NormalizedTable)], candidates: &Candidates<'_>) -> Option<Evidence> {
        tables.iter().find_map(|(label, table)| {
            self.pcode
                .find(table, &candidates.codes, MatchMode::Codes)
                .map(|column| Evidence::Pcode {
                    fragment: label.clone(),
                    column,
                })
        })
    }

    fn first_secondary_hit(
        &self,
        tables: &[(String, NormalizedTable)],
        candidates: &Candidates<'_>,
    ) -> Option<Evidence> {
        tables.iter().find_map(|(label, table)| match self.config.secondary {
            SecondaryCheck::Miscoded => self
                .pcode
                .find(table, &candidates.miscodes, MatchMode::Miscodes)
                .map(|column| Evidence::Miscode {
                    fragment: label.clone(),
                    column,
                }),
            SecondaryCheck::LatLong => self.latlong.find(table).map(|pair| Evidence::LatLong {
                fragment: label.clone(),
                pair,
            }),
        })
    }

    fn log_verdict(&self, dataset: &Dataset, resource: &Resource, verdict: &ResourceVerdict) {
        if verdict.secondary.is_detected() && self.config.secondary == SecondaryCheck::Miscoded {
            warn!(dataset = %dataset.name, resource = %resource.name, "may be mis-pcoded");
        }
        if let Some(e) = &verdict.error {
            error!(dataset = %dataset.name, resource = %resource.name, error = %e, "resource read error");
        }
        debug!(
            dataset = %dataset.name,
            resource = %resource.name,
            pcoded = %verdict.pcoded,
            secondary = %verdict.secondary,
            "classified resource"
        );
    }
}
