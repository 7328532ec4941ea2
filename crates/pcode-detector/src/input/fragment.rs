//! Raw tabular fragments read from one sheet, layer or file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Prefix of auto-generated column names for headers that were absent.
pub const PLACEHOLDER_PREFIX: &str = "Unnamed";

/// Auto-generated name for the column at `index`.
pub fn placeholder_name(index: usize) -> String {
    format!("{}: {}", PLACEHOLDER_PREFIX, index)
}

/// Whether a column key is an auto-generated placeholder.
pub fn is_placeholder(key: &str) -> bool {
    key.starts_with(PLACEHOLDER_PREFIX)
}

/// File formats a resource can be fetched as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
    Json,
    GeoJson,
    TopoJson,
    Shapefile,
    Geodatabase,
    Geopackage,
    Other(String),
}

impl FileFormat {
    /// Map a catalog file type (e.g. "Geodatabase", "zipped shapefile") to a format.
    pub fn from_filetype(filetype: &str) -> Self {
        let lower = filetype.trim().to_lowercase();
        match lower.as_str() {
            "csv" | "zipped csv" => FileFormat::Csv,
            "xlsx" => FileFormat::Xlsx,
            "xls" => FileFormat::Xls,
            "json" => FileFormat::Json,
            "geojson" | "zipped geojson" => FileFormat::GeoJson,
            "topojson" => FileFormat::TopoJson,
            "shp" | "shapefile" | "zipped shapefile" => FileFormat::Shapefile,
            "gdb" | "geodatabase" | "zipped geodatabase" => FileFormat::Geodatabase,
            "gpkg" | "geopackage" | "zipped geopackage" => FileFormat::Geopackage,
            _ => FileFormat::Other(lower),
        }
    }

    /// File extension files of this format carry.
    pub fn extension(&self) -> &str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Json => "json",
            FileFormat::GeoJson => "geojson",
            FileFormat::TopoJson => "topojson",
            FileFormat::Shapefile => "shp",
            FileFormat::Geodatabase => "gdb",
            FileFormat::Geopackage => "gpkg",
            FileFormat::Other(ext) => ext.as_str(),
        }
    }

    /// Whether this is a spreadsheet workbook format.
    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xls)
    }

    /// Whether this is a comma-delimited text format.
    pub fn is_delimited(&self) -> bool {
        matches!(self, FileFormat::Csv)
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Whether the upstream reader already inferred a column schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaHint {
    /// Every value came through as generic text; header rows still need locating.
    #[default]
    Untyped,
    /// The reader typed at least one column; the header is taken as-is.
    Inferred,
}

/// Where a fragment came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentSource {
    /// Path of the file the fragment was read from.
    pub path: PathBuf,
    /// Sheet or layer name inside the file, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// SHA-256 of the file contents.
    pub hash: String,
}

/// A rectangular sample of rows from one logical unit of a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    /// Column identifiers as read (placeholders where absent).
    pub columns: Vec<String>,
    /// Row values; empty strings are missing cells.
    pub rows: Vec<Vec<String>>,
    /// Format the fragment was read as.
    pub format: FileFormat,
    /// Schema signal from the reader.
    pub schema: SchemaHint,
    /// Provenance, for logging.
    pub source: FragmentSource,
}

impl RawFragment {
    /// Create a fragment, squaring up ragged rows.
    ///
    /// Short rows are padded with empty cells. Rows longer than the header
    /// extend it with placeholder columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>, format: FileFormat) -> Self {
        let mut columns = columns;
        let width = rows
            .iter()
            .map(|row| row.len())
            .max()
            .unwrap_or(0)
            .max(columns.len());

        while columns.len() < width {
            columns.push(placeholder_name(columns.len()));
        }

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            columns,
            rows,
            format,
            schema: SchemaHint::Untyped,
            source: FragmentSource::default(),
        }
    }

    /// Set the schema hint.
    pub fn with_schema(mut self, schema: SchemaHint) -> Self {
        self.schema = schema;
        self
    }

    /// Set the provenance.
    pub fn with_source(mut self, source: FragmentSource) -> Self {
        self.source = source;
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Short label for log lines.
    pub fn label(&self) -> String {
        let file = self
            .source
            .path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &self.source.layer {
            Some(layer) => format!("{}:{}", file, layer),
            None => file,
        }
    }
}

/// Whether a cell counts as missing.
pub fn is_empty_cell(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ragged_rows_are_squared() {
        let fragment = RawFragment::new(
            row(&["a", "b"]),
            vec![row(&["1"]), row(&["1", "2", "3"])],
            FileFormat::Csv,
        );
        assert_eq!(fragment.columns, vec!["a", "b", "Unnamed: 2"]);
        assert_eq!(fragment.rows[0], row(&["1", "", ""]));
        assert_eq!(fragment.rows[1].len(), 3);
    }

    #[test]
    fn test_filetype_mapping() {
        assert_eq!(FileFormat::from_filetype("Geodatabase"), FileFormat::Geodatabase);
        assert_eq!(FileFormat::from_filetype("geopackage").extension(), "gpkg");
        assert_eq!(FileFormat::from_filetype("zipped shapefile"), FileFormat::Shapefile);
        assert_eq!(FileFormat::from_filetype("CSV"), FileFormat::Csv);
        assert_eq!(FileFormat::from_filetype("PDF"), FileFormat::Other("pdf".to_string()));
    }

    #[test]
    fn test_placeholder() {
        assert!(is_placeholder(&placeholder_name(4)));
        assert!(!is_placeholder("admin1Pcode"));
    }
}
