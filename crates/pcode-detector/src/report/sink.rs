//! Result sinks.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::config::SecondaryCheck;
use crate::error::{DetectorError, Result};

use super::row::ReportRow;

/// Receives one row per classified resource.
pub trait ResultSink {
    fn record(&mut self, row: &ReportRow) -> Result<()>;

    /// Flush buffered output. Called once after the last row.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Report column headers for a secondary check.
pub fn report_header(secondary: SecondaryCheck) -> [&'static str; 6] {
    [
        "dataset name",
        "dataset title",
        "resource name",
        "pcoded",
        secondary.label(),
        "error",
    ]
}

/// Writes rows as CSV, header first.
pub struct CsvReportSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvReportSink<File> {
    /// Create a report file, creating its parent directory if needed.
    pub fn create(path: impl AsRef<Path>, secondary: SecondaryCheck) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| DetectorError::io(parent, e))?;
            }
        }
        let file = File::create(path).map_err(|e| DetectorError::io(path, e))?;
        Self::from_writer(file, secondary)
    }
}

impl<W: Write> CsvReportSink<W> {
    pub fn from_writer(writer: W, secondary: SecondaryCheck) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(report_header(secondary))?;
        Ok(Self { writer, rows: 0 })
    }

    /// Rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| DetectorError::from(csv::Error::from(e.into_error())))
    }
}

impl<W: Write> ResultSink for CsvReportSink<W> {
    fn record(&mut self, row: &ReportRow) -> Result<()> {
        self.writer.write_record(row.fields())?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Collects rows in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<ReportRow>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, row: &ReportRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}
