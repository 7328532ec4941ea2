//! Sources of reference code records.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::ReferenceConfig;
use crate::error::{DetectorError, Result};

use super::index::CodeRecord;

/// Yields the (scope, admin level, code) records the index is built from.
pub trait ReferenceSource {
    fn records(&self) -> Result<Vec<CodeRecord>>;
}

impl ReferenceSource for Vec<CodeRecord> {
    fn records(&self) -> Result<Vec<CodeRecord>> {
        Ok(self.clone())
    }
}

impl ReferenceSource for [CodeRecord] {
    fn records(&self) -> Result<Vec<CodeRecord>> {
        Ok(self.to_vec())
    }
}

/// Reads reference records from a CSV file with named columns.
#[derive(Debug, Clone)]
pub struct CsvReferenceSource {
    path: PathBuf,
    code_column: String,
    scope_column: String,
    level_column: String,
}

impl CsvReferenceSource {
    /// Create a source using the default column names.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let defaults = ReferenceConfig::default();
        Self {
            path: path.into(),
            code_column: defaults.code_column,
            scope_column: defaults.scope_column,
            level_column: defaults.level_column,
        }
    }

    /// Create a source from reference configuration.
    pub fn from_config(config: &ReferenceConfig) -> Result<Self> {
        let path = config.path.clone().ok_or_else(|| {
            DetectorError::Config("reference.path is not set".to_string())
        })?;
        Ok(Self {
            path,
            code_column: config.code_column.clone(),
            scope_column: config.scope_column.clone(),
            level_column: config.level_column.clone(),
        })
    }

    /// Override the column names.
    pub fn with_columns(
        mut self,
        scope: impl Into<String>,
        level: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        self.scope_column = scope.into();
        self.level_column = level.into();
        self.code_column = code.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse records from any reader.
    pub fn read_records<R: Read>(&self, reader: R) -> Result<Vec<CodeRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let code_idx = position(&self.code_column).ok_or_else(|| {
            DetectorError::Config(format!(
                "reference column '{}' not found in {}",
                self.code_column,
                self.path.display()
            ))
        })?;
        let scope_idx = position(&self.scope_column).ok_or_else(|| {
            DetectorError::Config(format!(
                "reference column '{}' not found in {}",
                self.scope_column,
                self.path.display()
            ))
        })?;
        let level_idx = position(&self.level_column);

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let field = |idx: usize| row.get(idx).unwrap_or("").to_string();
            records.push(CodeRecord {
                scope: field(scope_idx),
                admin_level: level_idx.map(|idx| field(idx)).unwrap_or_default(),
                code: field(code_idx),
            });
        }

        Ok(records)
    }
}

impl ReferenceSource for CsvReferenceSource {
    fn records(&self) -> Result<Vec<CodeRecord>> {
        let file = File::open(&self.path).map_err(|e| DetectorError::io(&self.path, e))?;
        self.read_records(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_named_columns() {
        let data = "Location,Admin Level,P-Code,Name\n\
                    AFG,1,AF01,Kabul\n\
                    AFG,2,AF0101,Kabul\n\
                    COL,1,CO05\n";
        let source = CsvReferenceSource::new("codes.csv");
        let records = source.read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1], CodeRecord::new("AFG", "2", "AF0101"));
        assert_eq!(records[2].code, "CO05");
    }

    #[test]
    fn test_custom_columns() {
        let data = "iso3,level,pcode\nAFG,1,AF01\n";
        let source = CsvReferenceSource::new("codes.csv").with_columns("iso3", "level", "pcode");
        let records = source.read_records(data.as_bytes()).unwrap();
        assert_eq!(records, vec![CodeRecord::new("AFG", "1", "AF01")]);
    }

    #[test]
    fn test_missing_column_is_config_error() {
        let data = "iso3,pcode\nAFG,AF01\n";
        let err = CsvReferenceSource::new("codes.csv")
            .read_records(data.as_bytes())
            .unwrap_err();
        assert!(matches!(err, DetectorError::Config(_)));
    }

    #[test]
    fn test_short_rows_yield_empty_fields() {
        let data = "Location,Admin Level,P-Code\nAFG,1\n";
        let records = CsvReferenceSource::new("codes.csv")
            .read_records(data.as_bytes())
            .unwrap();
        assert_eq!(records[0].code, "");
    }
}
