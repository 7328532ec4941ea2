//! Readers turning local files into raw fragments.

use std::borrow::Cow;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use dbase::FieldValue;
use indexmap::IndexMap;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::config::DEFAULT_SAMPLE_ROWS;
use crate::error::{DetectorError, Result};

use super::fragment::{
    FileFormat, FragmentSource, RawFragment, SchemaHint, is_empty_cell, placeholder_name,
};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b',', b'\t', b';', b'|'];

/// Reads a bounded sample of rows from local files.
#[derive(Debug, Clone)]
pub struct FragmentReader {
    sample_rows: usize,
}

impl FragmentReader {
    /// Create a reader with the default row cap.
    pub fn new() -> Self {
        Self::with_sample_rows(DEFAULT_SAMPLE_ROWS)
    }

    /// Create a reader with a custom row cap.
    pub fn with_sample_rows(sample_rows: usize) -> Self {
        Self {
            sample_rows: sample_rows.max(1),
        }
    }

    pub fn sample_rows(&self) -> usize {
        self.sample_rows
    }

    /// Read every fragment a file holds.
    ///
    /// Spreadsheets yield one fragment per non-empty sheet, GeoPackages and
    /// TopoJSON one per layer; other formats yield one fragment.
    pub fn read_path(&self, path: impl AsRef<Path>, format: &FileFormat) -> Result<Vec<RawFragment>> {
        let path = path.as_ref();
        if let FileFormat::Geodatabase | FileFormat::Other(_) = format {
            return Err(DetectorError::UnsupportedFormat(format!(
                "cannot read {} files",
                format
            )));
        }

        let contents = fs::read(path).map_err(|e| DetectorError::io(path, e))?;
        let hash = content_hash(&contents);
        let source = FragmentSource {
            path: path.to_path_buf(),
            layer: None,
            hash,
        };

        match format {
            FileFormat::Csv => Ok(vec![self.read_delimited(&contents)?.with_source(source)]),
            FileFormat::Xlsx | FileFormat::Xls => self.read_workbook(path, source),
            FileFormat::Json | FileFormat::GeoJson => {
                Ok(vec![self.read_json(&contents)?.with_source(source)])
            }
            FileFormat::TopoJson => Ok(self
                .read_topojson(&contents)?
                .into_iter()
                .map(|fragment| {
                    let layer = fragment.source.layer.clone();
                    fragment.with_source(FragmentSource {
                        layer,
                        ..source.clone()
                    })
                })
                .collect()),
            FileFormat::Shapefile => Ok(vec![self.read_shapefile(path)?.with_source(source)]),
            FileFormat::Geopackage => self.read_geopackage(path, source),
            other => Err(DetectorError::UnsupportedFormat(format!(
                "cannot read {} files",
                other
            ))),
        }
    }

    /// Parse delimited text. The first record is the header row.
    ///
    /// Text that is not valid UTF-8 is decoded as Windows-1252.
    pub fn read_delimited(&self, bytes: &[u8]) -> Result<RawFragment> {
        let text = decode_text(bytes);
        let delimiter = detect_delimiter(text.as_bytes())?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            Some(record) => record?,
            None => return Err(DetectorError::EmptyData("No header row found".to_string())),
        };
        let columns = header_names(header.iter());

        let mut rows = Vec::new();
        for result in records.take(self.sample_rows) {
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(RawFragment::new(columns, rows, FileFormat::Csv))
    }

    /// Read every non-empty sheet of a workbook.
    fn read_workbook(&self, path: &Path, source: FragmentSource) -> Result<Vec<RawFragment>> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xls") => FileFormat::Xls,
            _ => FileFormat::Xlsx,
        };

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| DetectorError::Spreadsheet(format!("Failed to open workbook: {}", e)))?;

        let mut fragments = Vec::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                DetectorError::Spreadsheet(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;

            let mut sheet_rows = range.rows();
            let Some(header) = sheet_rows.next() else {
                continue;
            };
            let columns = header_names(header.iter().map(cell_to_string));

            let cells: Vec<&[Data]> = sheet_rows.take(self.sample_rows).collect();
            if cells.is_empty() {
                continue;
            }

            let schema = sheet_schema(&cells);
            let rows = cells
                .iter()
                .map(|row| row.iter().map(cell_to_string).collect())
                .collect();

            let fragment = RawFragment::new(columns, rows, format.clone())
                .with_schema(schema)
                .with_source(FragmentSource {
                    layer: Some(sheet_name.clone()),
                    ..source.clone()
                });
            fragments.push(fragment);
        }

        Ok(fragments)
    }

    /// Read a GeoJSON FeatureCollection's properties or an array of objects.
    pub fn read_json(&self, bytes: &[u8]) -> Result<RawFragment> {
        let value: Value = serde_json::from_slice(bytes)?;

        let records: Vec<&Map<String, Value>> = match &value {
            Value::Object(object) if object.contains_key("features") => object
                .get("features")
                .and_then(|f| f.as_array())
                .map(|features| {
                    features
                        .iter()
                        .filter_map(|feature| feature.get("properties"))
                        .filter_map(|p| p.as_object())
                        .collect()
                })
                .unwrap_or_default(),
            Value::Array(items) => items.iter().filter_map(|item| item.as_object()).collect(),
            _ => {
                return Err(DetectorError::UnsupportedFormat(
                    "JSON is neither a FeatureCollection nor an array of records".to_string(),
                ));
            }
        };

        self.records_fragment(&records, FileFormat::GeoJson)
            .ok_or_else(|| DetectorError::EmptyData("No records in JSON".to_string()))
    }

    /// Read the geometry properties of every TopoJSON object, one fragment per object.
    pub fn read_topojson(&self, bytes: &[u8]) -> Result<Vec<RawFragment>> {
        let value: Value = serde_json::from_slice(bytes)?;
        let objects = value
            .get("objects")
            .and_then(|o| o.as_object())
            .ok_or_else(|| {
                DetectorError::UnsupportedFormat("TopoJSON has no objects".to_string())
            })?;

        let mut fragments = Vec::new();
        for (name, object) in objects {
            let records: Vec<&Map<String, Value>> = object
                .get("geometries")
                .and_then(|g| g.as_array())
                .map(|geometries| {
                    geometries
                        .iter()
                        .filter_map(|geometry| geometry.get("properties"))
                        .filter_map(|p| p.as_object())
                        .collect()
                })
                .unwrap_or_default();

            if let Some(fragment) = self.records_fragment(&records, FileFormat::TopoJson) {
                fragments.push(fragment.with_source(FragmentSource {
                    layer: Some(name.clone()),
                    ..FragmentSource::default()
                }));
            }
        }

        if fragments.is_empty() {
            return Err(DetectorError::EmptyData("No properties in TopoJSON".to_string()));
        }
        Ok(fragments)
    }

    /// Read the dBase attribute table beside a `.shp` file.
    pub fn read_shapefile(&self, path: &Path) -> Result<RawFragment> {
        let dbf = path.with_extension("dbf");
        let mut reader = dbase::Reader::from_path(&dbf)
            .map_err(|e| DetectorError::Shapefile(format!("{}: {}", dbf.display(), e)))?;

        let columns: Vec<String> = reader
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            // dBase pseudo-field for the record deletion marker
            .filter(|name| name != "DeletionFlag")
            .collect();

        let mut rows = Vec::new();
        for record in reader.iter_records().take(self.sample_rows) {
            let record = record.map_err(|e| DetectorError::Shapefile(e.to_string()))?;
            rows.push(
                columns
                    .iter()
                    .map(|name| record.get(name).map(field_to_string).unwrap_or_default())
                    .collect(),
            );
        }

        if rows.is_empty() {
            return Err(DetectorError::EmptyData("No records in shapefile".to_string()));
        }
        Ok(RawFragment::new(columns, rows, FileFormat::Shapefile).with_schema(SchemaHint::Inferred))
    }

    /// Read every feature and attribute table listed in `gpkg_contents`.
    ///
    /// Geometry columns are left out.
    fn read_geopackage(&self, path: &Path, source: FragmentSource) -> Result<Vec<RawFragment>> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let layers: Vec<String> = {
            let mut stmt = conn.prepare(
                "SELECT table_name FROM gpkg_contents \
                 WHERE data_type IN ('features', 'attributes') ORDER BY table_name",
            )?;
            let names = stmt.query_map([], |row| row.get(0))?;
            names.collect::<std::result::Result<_, _>>()?
        };

        let mut fragments = Vec::new();
        for layer in layers {
            let geometry_columns: Vec<String> = {
                let mut stmt = conn
                    .prepare("SELECT column_name FROM gpkg_geometry_columns WHERE table_name = ?1")?;
                let names = stmt.query_map([&layer], |row| row.get(0))?;
                names.collect::<std::result::Result<_, _>>()?
            };

            let query = format!(
                "SELECT * FROM \"{}\" LIMIT {}",
                layer.replace('"', "\"\""),
                self.sample_rows
            );
            let mut stmt = conn.prepare(&query)?;
            let keep: Vec<(usize, String)> = stmt
                .column_names()
                .into_iter()
                .enumerate()
                .filter(|(_, name)| !geometry_columns.iter().any(|g| g.eq_ignore_ascii_case(name)))
                .map(|(i, name)| (i, name.to_string()))
                .collect();

            let mut rows = Vec::new();
            let mut result = stmt.query([])?;
            while let Some(row) = result.next()? {
                let mut values = Vec::with_capacity(keep.len());
                for (i, _) in &keep {
                    values.push(sql_to_string(row.get_ref(*i)?));
                }
                rows.push(values);
            }

            if rows.is_empty() {
                continue;
            }
            let columns = keep.into_iter().map(|(_, name)| name).collect();
            fragments.push(
                RawFragment::new(columns, rows, FileFormat::Geopackage)
                    .with_schema(SchemaHint::Inferred)
                    .with_source(FragmentSource {
                        layer: Some(layer),
                        ..source.clone()
                    }),
            );
        }

        Ok(fragments)
    }

    /// Square up JSON records under the union of their keys.
    fn records_fragment(&self, records: &[&Map<String, Value>], format: FileFormat) -> Option<RawFragment> {
        if records.is_empty() {
            return None;
        }

        // Union of keys in first-seen order
        let mut keys: IndexMap<&str, ()> = IndexMap::new();
        for record in records {
            for key in record.keys() {
                keys.entry(key.as_str()).or_insert(());
            }
        }

        let rows = records
            .iter()
            .take(self.sample_rows)
            .map(|record| {
                keys.keys()
                    .map(|key| record.get(*key).map(json_to_string).unwrap_or_default())
                    .collect()
            })
            .collect();
        let columns = keys.keys().map(|k| k.to_string()).collect();

        Some(RawFragment::new(columns, rows, format).with_schema(SchemaHint::Inferred))
    }
}

impl Default for FragmentReader {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 of file contents, prefixed like `sha256:<hex>`.
pub fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("sha256:{:x}", hasher.finalize())
}

/// Header strings with placeholders for blank names.
fn header_names<S: AsRef<str>>(names: impl Iterator<Item = S>) -> Vec<String> {
    names
        .enumerate()
        .map(|(i, name)| {
            let name = name.as_ref().trim();
            if name.is_empty() {
                placeholder_name(i)
            } else {
                name.to_string()
            }
        })
        .collect()
}

/// A sheet is typed when some populated column holds no text at all.
fn sheet_schema(rows: &[&[Data]]) -> SchemaHint {
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);

    for col in 0..width {
        let mut populated = false;
        let mut has_text = false;
        for row in rows {
            match row.get(col) {
                None | Some(Data::Empty) => {}
                Some(Data::String(s)) if is_empty_cell(s) => {}
                Some(Data::String(_)) | Some(Data::DateTimeIso(_)) | Some(Data::DurationIso(_)) => {
                    populated = true;
                    has_text = true;
                }
                Some(_) => populated = true,
            }
        }
        if populated && !has_text {
            return SchemaHint::Inferred;
        }
    }

    SchemaHint::Untyped
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

fn field_to_string(value: &FieldValue) -> String {
    match value {
        FieldValue::Character(text) => text.as_deref().unwrap_or_default().trim().to_string(),
        FieldValue::Memo(text) => text.trim().to_string(),
        FieldValue::Numeric(n) => n.map(format_number).unwrap_or_default(),
        FieldValue::Float(n) => n.map(|n| format_number(f64::from(n))).unwrap_or_default(),
        FieldValue::Double(n) | FieldValue::Currency(n) => format_number(*n),
        FieldValue::Integer(n) => n.to_string(),
        FieldValue::Logical(b) => b.map(|b| if b { "TRUE" } else { "FALSE" }.to_string()).unwrap_or_default(),
        FieldValue::Date(None) => String::new(),
        FieldValue::Date(Some(d)) => format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()),
        other => format!("{:?}", other),
    }
}

fn sql_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => String::new(),
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(n) => format_number(n),
        ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
    }
}

/// Integers without decimals.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Decode text as UTF-8, falling back to Windows-1252 for legacy exports.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0,
    }
}

fn json_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(DetectorError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts beat higher but ragged ones
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n4,5,6").unwrap(), b',');
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3").unwrap(), b'\t');
        assert_eq!(detect_delimiter(b"a;b\n\"x;y\";2").unwrap(), b';');
    }

    #[test]
    fn test_read_delimited() {
        let data = b"admin1Pcode,,name\nAF01,x,Kabul\nAF02,,Kandahar\n";
        let fragment = FragmentReader::new().read_delimited(data).unwrap();

        assert_eq!(fragment.columns, vec!["admin1Pcode", "Unnamed: 1", "name"]);
        assert_eq!(fragment.row_count(), 2);
        assert_eq!(fragment.rows[1][1], "");
        assert_eq!(fragment.schema, SchemaHint::Untyped);
        assert_eq!(fragment.format, FileFormat::Csv);
    }

    #[test]
    fn test_sample_cap() {
        let mut data = String::from("code\n");
        for i in 0..50 {
            data.push_str(&format!("AF{:02}\n", i));
        }
        let fragment = FragmentReader::with_sample_rows(10)
            .read_delimited(data.as_bytes())
            .unwrap();
        assert_eq!(fragment.row_count(), 10);
    }

    #[test]
    fn test_empty_csv() {
        assert!(matches!(
            FragmentReader::new().read_delimited(b""),
            Err(DetectorError::EmptyData(_))
        ));
    }

    #[test]
    fn test_read_geojson_properties() {
        let data = br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"ADM1_PCODE":"AF01","pop":12},"geometry":null},
            {"type":"Feature","properties":{"ADM1_PCODE":"AF02","name":null},"geometry":null}
        ]}"#;
        let fragment = FragmentReader::new().read_json(data).unwrap();

        assert_eq!(fragment.columns, vec!["ADM1_PCODE", "pop", "name"]);
        assert_eq!(fragment.rows[0], vec!["AF01", "12", ""]);
        assert_eq!(fragment.rows[1], vec!["AF02", "", ""]);
        assert_eq!(fragment.schema, SchemaHint::Inferred);
    }

    #[test]
    fn test_read_json_records() {
        let data = br#"[{"lat":"34.5","lon":"69.1"},{"lat":"31.6","lon":"65.7"}]"#;
        let fragment = FragmentReader::new().read_json(data).unwrap();
        assert_eq!(fragment.columns, vec!["lat", "lon"]);
        assert_eq!(fragment.row_count(), 2);
    }

    #[test]
    fn test_unsupported_json() {
        assert!(FragmentReader::new().read_json(b"42").is_err());
        assert!(FragmentReader::new().read_json(b"not json").is_err());
    }

    #[test]
    fn test_sheet_schema() {
        let text = [Data::String("AF01".to_string()), Data::Float(1.0)];
        let more_text = [Data::String("AF02".to_string()), Data::String("n/a".to_string())];
        assert_eq!(sheet_schema(&[&text[..], &more_text[..]]), SchemaHint::Untyped);
        assert_eq!(sheet_schema(&[&text[..]]), SchemaHint::Inferred);
    }

    #[test]
    fn test_content_hash() {
        let hash = content_hash(b"abc");
        assert!(hash.starts_with("sha256:ba7816bf"));
    }

    #[test]
    fn test_geodatabase_unsupported() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = FragmentReader::new()
            .read_path(dir.path().join("admin.gdb"), &FileFormat::Geodatabase)
            .unwrap_err();
        assert!(matches!(err, DetectorError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_latin1_csv() {
        let data = b"admin1Pcode,name\nAF01,H\xE9rat\nAF02,Kabul\n";
        let fragment = FragmentReader::new().read_delimited(data).unwrap();

        assert_eq!(fragment.columns, vec!["admin1Pcode", "name"]);
        assert_eq!(fragment.rows[0], vec!["AF01", "Hérat"]);
        assert_eq!(fragment.rows[1], vec!["AF02", "Kabul"]);
    }

    #[test]
    fn test_read_topojson_objects() {
        let data = br#"{"type":"Topology","objects":{
            "adm1":{"type":"GeometryCollection","geometries":[
                {"type":"Polygon","arcs":[[0]],"properties":{"ADM1_PCODE":"AF01"}},
                {"type":"Polygon","arcs":[[1]],"properties":{"ADM1_PCODE":"AF02"}}
            ]},
            "empty":{"type":"GeometryCollection","geometries":[]}
        },"arcs":[]}"#;
        let fragments = FragmentReader::new().read_topojson(data).unwrap();

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].source.layer.as_deref(), Some("adm1"));
        assert_eq!(fragments[0].columns, vec!["ADM1_PCODE"]);
        assert_eq!(fragments[0].row_count(), 2);
        assert_eq!(fragments[0].format, FileFormat::TopoJson);
        assert_eq!(fragments[0].schema, SchemaHint::Inferred);
    }

    /// Minimal dBase III table of character fields.
    fn write_dbf(path: &Path, fields: &[(&str, u8)], rows: &[&[&str]]) {
        let record_len: u16 = 1 + fields.iter().map(|(_, w)| *w as u16).sum::<u16>();
        let header_len: u16 = 32 + 32 * fields.len() as u16 + 1;

        let mut bytes = vec![0x03, 124, 1, 1];
        bytes.extend_from_slice(&(rows.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&header_len.to_le_bytes());
        bytes.extend_from_slice(&record_len.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 20]);
        for (name, width) in fields {
            let mut descriptor = [0u8; 32];
            descriptor[..name.len()].copy_from_slice(name.as_bytes());
            descriptor[11] = b'C';
            descriptor[16] = *width;
            bytes.extend_from_slice(&descriptor);
        }
        bytes.push(0x0D);
        for row in rows {
            bytes.push(b' ');
            for ((_, width), value) in fields.iter().zip(row.iter()) {
                bytes.extend_from_slice(format!("{:<1$}", value, *width as usize).as_bytes());
            }
        }
        bytes.push(0x1A);
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_read_shapefile_attributes() {
        let dir = tempfile::TempDir::new().unwrap();
        let shp = dir.path().join("adm1.shp");
        fs::write(&shp, b"shape").unwrap();
        write_dbf(
            &dir.path().join("adm1.dbf"),
            &[("ADM1_PCODE", 8), ("ADM1_EN", 12)],
            &[&["AF01", "Kabul"], &["AF02", "Herat"]],
        );

        let fragments = FragmentReader::new()
            .read_path(&shp, &FileFormat::Shapefile)
            .unwrap();

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].columns, vec!["ADM1_PCODE", "ADM1_EN"]);
        assert_eq!(fragments[0].rows[0], vec!["AF01", "Kabul"]);
        assert_eq!(fragments[0].rows[1], vec!["AF02", "Herat"]);
        assert_eq!(fragments[0].schema, SchemaHint::Inferred);
    }

    #[test]
    fn test_shapefile_without_dbf() {
        let dir = tempfile::TempDir::new().unwrap();
        let shp = dir.path().join("roads.shp");
        fs::write(&shp, b"shape").unwrap();

        let err = FragmentReader::new()
            .read_path(&shp, &FileFormat::Shapefile)
            .unwrap_err();
        assert!(matches!(err, DetectorError::Shapefile(_)));
    }

    #[test]
    fn test_read_geopackage_layers() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("admin.gpkg");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE gpkg_contents (table_name TEXT PRIMARY KEY, data_type TEXT NOT NULL);
             CREATE TABLE gpkg_geometry_columns (table_name TEXT, column_name TEXT);
             CREATE TABLE adm1 (fid INTEGER PRIMARY KEY, geom BLOB, ADM1_PCODE TEXT, area REAL);
             CREATE TABLE sites (fid INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE unused (fid INTEGER PRIMARY KEY);
             INSERT INTO gpkg_contents VALUES ('adm1', 'features'), ('sites', 'attributes'), ('unused', 'tiles');
             INSERT INTO gpkg_geometry_columns VALUES ('adm1', 'geom');
             INSERT INTO adm1 VALUES (1, x'00', 'AF01', 12.5), (2, NULL, 'AF02', 3.0);
             INSERT INTO sites VALUES (1, 'clinic');",
        )
        .unwrap();
        drop(conn);

        let fragments = FragmentReader::new()
            .read_path(&path, &FileFormat::Geopackage)
            .unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].source.layer.as_deref(), Some("adm1"));
        assert_eq!(fragments[0].columns, vec!["fid", "ADM1_PCODE", "area"]);
        assert_eq!(fragments[0].rows[0], vec!["1", "AF01", "12.5"]);
        assert_eq!(fragments[0].rows[1], vec!["2", "AF02", "3"]);
        assert_eq!(fragments[1].source.layer.as_deref(), Some("sites"));
        assert_eq!(fragments[1].rows, vec![vec!["1", "clinic"]]);
        assert!(fragments.iter().all(|f| f.schema == SchemaHint::Inferred));
    }
}
