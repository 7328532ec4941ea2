//! Batch driver.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::classify::{Classifier, ResourceVerdict, SizeProbe, Verdict};
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::input::{DataAcquirer, Dataset};
use crate::reference::{CodeIndexBuilder, ReferenceCodes, ReferenceSource};
use crate::report::{ReportRow, ResultSink};

/// Counts over one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub datasets: usize,
    pub resources: usize,
    pub pcoded: usize,
    pub secondary: usize,
    pub not_detected: usize,
    pub unknown: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl BatchSummary {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            datasets: 0,
            resources: 0,
            pcoded: 0,
            secondary: 0,
            not_detected: 0,
            unknown: 0,
            skipped: 0,
            errors: 0,
        }
    }

    fn count(&mut self, verdict: &ResourceVerdict) {
        self.resources += 1;
        match verdict.pcoded {
            Verdict::Detected => self.pcoded += 1,
            Verdict::NotDetected => self.not_detected += 1,
            Verdict::Unknown => self.unknown += 1,
        }
        if verdict.secondary.is_detected() {
            self.secondary += 1;
        }
        if verdict.skipped.is_some() {
            self.skipped += 1;
        }
        if verdict.has_error() {
            self.errors += 1;
        }
    }

    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Classifies every resource of a batch against indices built once.
pub struct Detector {
    config: DetectorConfig,
    reference: ReferenceCodes,
}

impl Detector {
    /// Build the code indices from a reference source.
    pub fn new(config: DetectorConfig, source: &dyn ReferenceSource) -> Result<Self> {
        config.validate()?;
        let records = source.records()?;
        let reference = CodeIndexBuilder::new()
            .with_locations(config.reference.locations.iter().cloned())
            .build(records);
        info!(
            codes = reference.codes.len(),
            miscodes = reference.miscodes.len(),
            "loaded reference codes"
        );
        Ok(Self { config, reference })
    }

    /// Use indices that were already built.
    pub fn with_reference(config: DetectorConfig, reference: ReferenceCodes) -> Self {
        Self { config, reference }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceCodes {
        &self.reference
    }

    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.config, &self.reference)
    }

    /// Classify every resource of every dataset, recording one row each.
    ///
    /// Only a sink failure aborts the run.
    pub fn run(
        &self,
        datasets: &[Dataset],
        acquirer: &dyn DataAcquirer,
        probe: &dyn SizeProbe,
        sink: &mut dyn ResultSink,
    ) -> Result<BatchSummary> {
        let classifier = self.classifier();
        let mut summary = BatchSummary::new();

        info!(datasets = datasets.len(), "starting batch");
        for dataset in datasets {
            summary.datasets += 1;
            info!(dataset = %dataset.name, resources = dataset.resources.len(), "checking dataset");

            for resource in &dataset.resources {
                info!(dataset = %dataset.name, resource = %resource.name, "checking resource");
                let verdict = classifier.classify(dataset, resource, acquirer, probe);
                summary.count(&verdict);
                sink.record(&ReportRow::new(dataset, resource, &verdict))?;
            }
        }
        sink.finish()?;

        summary.finished_at = Utc::now();
        info!(
            resources = summary.resources,
            pcoded = summary.pcoded,
            unknown = summary.unknown,
            errors = summary.errors,
            "batch complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::NoProbe;
    use crate::error::DetectorError;
    use crate::input::{Acquired, FileFormat, RawFragment, Resource};
    use crate::reference::CodeRecord;
    use crate::report::MemorySink;

    struct CsvAcquirer;

    impl DataAcquirer for CsvAcquirer {
        fn acquire(&self, resource: &Resource, _format: &FileFormat) -> Result<Acquired> {
            if resource.url.contains("broken") {
                return Err(DetectorError::Acquisition("Unable to download file".to_string()));
            }
            let rows = vec![vec!["AF01".to_string()], vec!["AF02".to_string()]];
            Ok(Acquired::from_fragments(vec![RawFragment::new(
                vec!["pcode".to_string()],
                rows,
                FileFormat::Csv,
            )]))
        }
    }

    struct FailingSink;

    impl ResultSink for FailingSink {
        fn record(&mut self, _row: &ReportRow) -> Result<()> {
            Err(DetectorError::Config("disk full".to_string()))
        }
    }

    fn detector() -> Detector {
        let records = vec![
            CodeRecord::new("AFG", "1", "AF01"),
            CodeRecord::new("AFG", "1", "AF02"),
        ];
        Detector::new(DetectorConfig::default(), &records).unwrap()
    }

    fn datasets() -> Vec<Dataset> {
        vec![Dataset::new("afg-admin")
            .with_locations(["AFG"])
            .with_resource(Resource::new("broken.csv", "broken.csv", "csv").with_size(10))
            .with_resource(Resource::new("adm1.csv", "adm1.csv", "csv").with_size(10))
            .with_resource(Resource::new("report.pdf", "report.pdf", "pdf"))]
    }

    #[test]
    fn test_one_row_per_resource() {
        let mut sink = MemorySink::new();
        let summary = detector()
            .run(&datasets(), &CsvAcquirer, &NoProbe, &mut sink)
            .unwrap();

        assert_eq!(sink.rows.len(), 3);
        assert_eq!(summary.resources, 3);
        assert_eq!(summary.pcoded, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 1);
        assert!(summary.elapsed() >= chrono::Duration::zero());

        assert_eq!(sink.rows[0].pcoded, Verdict::Unknown);
        assert_eq!(sink.rows[1].pcoded, Verdict::Detected);
        assert_eq!(sink.rows[2].pcoded, Verdict::NotDetected);
    }

    #[test]
    fn test_sink_failure_aborts() {
        let result = detector().run(&datasets(), &CsvAcquirer, &NoProbe, &mut FailingSink);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DetectorConfig {
            sample_rows: 0,
            ..DetectorConfig::default()
        };
        let records: Vec<CodeRecord> = Vec::new();
        assert!(Detector::new(config, &records).is_err());
    }
}
