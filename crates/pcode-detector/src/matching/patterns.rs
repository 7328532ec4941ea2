//! Declarative pattern tables for header names and cell values.
//!
//! Each table is a named list of regexes compiled once on first use. A value
//! matches a table when any of its patterns matches.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named set of alternative patterns.
#[derive(Debug)]
pub struct PatternTable {
    name: &'static str,
    patterns: Vec<Regex>,
}

impl PatternTable {
    /// Compile a table from pattern sources.
    ///
    /// Panics on an invalid pattern; tables are built from the constants below.
    fn compile(name: &'static str, sources: &[&str]) -> Self {
        let patterns = sources
            .iter()
            .map(|source| {
                Regex::new(source)
                    .unwrap_or_else(|e| panic!("invalid {} pattern {:?}: {}", name, source, e))
            })
            .collect();
        Self { name, patterns }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches the value.
    pub fn is_match(&self, value: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(value))
    }

    /// Whether any pattern matches any of the values.
    pub fn matches_any<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> bool {
        values.into_iter().any(|value| self.is_match(value.trim()))
    }
}

// =============================================================================
// HEADER PATTERNS
// =============================================================================

/// Administrative P-code headers ("ADM2 code", "admin1Pcode", "#adm1+pcode").
const PCODE_HEADER_PATTERNS: &[&str] = &[
    r"(?i)^(?:(?:adm)?.*p?.?cod.*)",
    r"(?i)^#\s?adm\s?\d?\+?\s?p?(?:code)?",
];

const LATITUDE_HEADER_PATTERNS: &[&str] = &[
    r"(?i)^lat(?:itude)?(?:\s*[(\[_.-]?\s*(?:dd|deg|degrees|decimal|wgs\s?84|n|y)\s*[)\]]?)?$",
    r"(?i)^(?:y|y[\s_]?coord(?:inate)?s?|coord(?:inate)?[\s_]?y|point[\s_]?y|gps[\s_]?lat(?:itude)?)$",
    r"(?i)latitude",
    r"(?i)(?:^|[\s_.-])lat$",
    r"(?i)^#geo\s*\+\s*lat",
];

const LONGITUDE_HEADER_PATTERNS: &[&str] = &[
    r"(?i)^(?:lon|long|lng|longitude)(?:\s*[(\[_.-]?\s*(?:dd|deg|degrees|decimal|wgs\s?84|e|x)\s*[)\]]?)?$",
    r"(?i)^(?:x|x[\s_]?coord(?:inate)?s?|coord(?:inate)?[\s_]?x|point[\s_]?x|gps[\s_]?lon(?:g|gitude)?)$",
    r"(?i)longitude",
    r"(?i)(?:^|[\s_.-])(?:lon|long|lng)$",
    r"(?i)^#geo\s*\+\s*lon",
];

// =============================================================================
// VALUE PATTERNS
// =============================================================================

const LATITUDE_VALUE_PATTERNS: &[&str] = &[
    // Decimal degrees
    r"^[+-]?(?:90(?:\.0+)?|[1-8]?\d(?:\.\d+)?)$",
    // Decimal comma
    r"^[+-]?(?:90(?:,0+)?|[1-8]?\d(?:,\d+)?)$",
    // Decimal degrees with degree sign and/or trailing hemisphere
    r"(?i)^[+-]?(?:90(?:\.0+)?|[1-8]?\d(?:\.\d+)?)\s*[°º]?\s*[NS]?$",
    // Leading hemisphere
    r"(?i)^[NS]\s*(?:90(?:\.0+)?|[1-8]?\d(?:\.\d+)?)\s*[°º]?$",
    // Degrees, minutes and optional seconds
    r#"(?i)^[+-]?(?:90|[1-8]?\d)\s*[°º:d]\s*[0-5]?\d(?:\.\d+)?\s*['′:m]\s*(?:[0-5]?\d(?:\.\d+)?\s*(?:"|″|''|s)?)?\s*[NS]?$"#,
    r#"(?i)^[NS]\s*(?:90|[1-8]?\d)\s*[°º:d]\s*[0-5]?\d(?:\.\d+)?\s*['′:m]\s*(?:[0-5]?\d(?:\.\d+)?\s*(?:"|″|''|s)?)?$"#,
];

const LONGITUDE_VALUE_PATTERNS: &[&str] = &[
    r"^[+-]?(?:180(?:\.0+)?|1[0-7]\d(?:\.\d+)?|[1-9]?\d(?:\.\d+)?)$",
    r"^[+-]?(?:180(?:,0+)?|1[0-7]\d(?:,\d+)?|[1-9]?\d(?:,\d+)?)$",
    r"(?i)^[+-]?(?:180(?:\.0+)?|1[0-7]\d(?:\.\d+)?|[1-9]?\d(?:\.\d+)?)\s*[°º]?\s*[EW]?$",
    r"(?i)^[EW]\s*(?:180(?:\.0+)?|1[0-7]\d(?:\.\d+)?|[1-9]?\d(?:\.\d+)?)\s*[°º]?$",
    r#"(?i)^[+-]?(?:180|1[0-7]\d|[1-9]?\d)\s*[°º:d]\s*[0-5]?\d(?:\.\d+)?\s*['′:m]\s*(?:[0-5]?\d(?:\.\d+)?\s*(?:"|″|''|s)?)?\s*[EW]?$"#,
    r#"(?i)^[EW]\s*(?:180|1[0-7]\d|[1-9]?\d)\s*[°º:d]\s*[0-5]?\d(?:\.\d+)?\s*['′:m]\s*(?:[0-5]?\d(?:\.\d+)?\s*(?:"|″|''|s)?)?$"#,
];

// =============================================================================
// LAZY STATIC TABLES
// =============================================================================

pub static PCODE_HEADER: Lazy<PatternTable> =
    Lazy::new(|| PatternTable::compile("pcode header", PCODE_HEADER_PATTERNS));

pub static LATITUDE_HEADER: Lazy<PatternTable> =
    Lazy::new(|| PatternTable::compile("latitude header", LATITUDE_HEADER_PATTERNS));

pub static LONGITUDE_HEADER: Lazy<PatternTable> =
    Lazy::new(|| PatternTable::compile("longitude header", LONGITUDE_HEADER_PATTERNS));

pub static LATITUDE_VALUE: Lazy<PatternTable> =
    Lazy::new(|| PatternTable::compile("latitude value", LATITUDE_VALUE_PATTERNS));

pub static LONGITUDE_VALUE: Lazy<PatternTable> =
    Lazy::new(|| PatternTable::compile("longitude value", LONGITUDE_VALUE_PATTERNS));
