//! Canonical code index and its mis-coding variants.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::country::{CountryLookup, CountryTable};

/// Sentinel scope holding every code regardless of country.
pub const ALL_SCOPE: &str = "ALL";

/// One row of the reference code table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    /// ISO3 location scope.
    pub scope: String,
    /// Administrative level the code belongs to.
    #[serde(default)]
    pub admin_level: String,
    /// The P-code itself.
    pub code: String,
}

impl CodeRecord {
    pub fn new(
        scope: impl Into<String>,
        admin_level: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            admin_level: admin_level.into(),
            code: code.into(),
        }
    }
}

/// Mapping from location scope to a set of code strings.
///
/// Every code stored under a country scope is also stored under [`ALL_SCOPE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeIndex {
    scopes: IndexMap<String, BTreeSet<String>>,
}

impl CodeIndex {
    /// Create an index holding only the empty global scope.
    pub fn new() -> Self {
        let mut scopes = IndexMap::new();
        scopes.insert(ALL_SCOPE.to_string(), BTreeSet::new());
        Self { scopes }
    }

    /// Insert a code under its scope and the global scope.
    fn insert(&mut self, scope: &str, code: &str) {
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .insert(code.to_string());
        self.scopes
            .entry(ALL_SCOPE.to_string())
            .or_default()
            .insert(code.to_string());
    }

    /// Codes for one scope.
    pub fn get(&self, scope: &str) -> Option<&BTreeSet<String>> {
        self.scopes.get(scope)
    }

    /// Whether a scope holds a code.
    pub fn contains(&self, scope: &str, code: &str) -> bool {
        self.scopes
            .get(scope)
            .is_some_and(|codes| codes.contains(code))
    }

    /// All scopes in first-seen order, global scope first.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(|s| s.as_str())
    }

    /// Flat candidate set for a dataset's declared locations.
    ///
    /// Only scopes named in `locations` contribute (ISO3 codes compare
    /// case-insensitively); an empty location list yields an empty set.
    pub fn candidates<'a>(&'a self, locations: &[String]) -> HashSet<&'a str> {
        locations
            .iter()
            .filter_map(|location| self.scopes.get(location.trim().to_uppercase().as_str()))
            .flat_map(|codes| codes.iter().map(|c| c.as_str()))
            .collect()
    }

    /// Number of distinct codes across all scopes.
    pub fn len(&self) -> usize {
        self.scopes.get(ALL_SCOPE).map_or(0, |codes| codes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CodeIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// The two indices built once per batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCodes {
    /// Valid codes.
    pub codes: CodeIndex,
    /// Variant spellings derived from the valid codes.
    pub miscodes: CodeIndex,
}

/// Builds [`ReferenceCodes`] from reference records.
pub struct CodeIndexBuilder<L = CountryTable> {
    lookup: L,
    locations: Vec<String>,
}

impl CodeIndexBuilder<CountryTable> {
    /// Create a builder using the built-in country table.
    pub fn new() -> Self {
        Self::with_lookup(CountryTable::new())
    }
}

impl Default for CodeIndexBuilder<CountryTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: CountryLookup> CodeIndexBuilder<L> {
    /// Create a builder with a custom country lookup.
    pub fn with_lookup(lookup: L) -> Self {
        Self {
            lookup,
            locations: Vec::new(),
        }
    }

    /// Only index records for these scopes. A list containing `ALL` keeps everything.
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    /// Build the code and mis-coding indices.
    pub fn build(&self, records: impl IntoIterator<Item = CodeRecord>) -> ReferenceCodes {
        let mut reference = ReferenceCodes::default();
        let mut skipped = 0usize;

        for record in records {
            let scope = record.scope.trim().to_uppercase();
            let code = record.code.trim();
            if scope.is_empty() || code.is_empty() {
                skipped += 1;
                continue;
            }
            if !self.keeps_scope(&scope) {
                continue;
            }

            reference.codes.insert(&scope, code);

            for variant in self.miscode_variants(&scope, code) {
                reference.miscodes.insert(&scope, &variant);
            }
        }

        debug!(
            codes = reference.codes.len(),
            miscodes = reference.miscodes.len(),
            skipped,
            "built reference code indices"
        );

        reference
    }

    fn keeps_scope(&self, scope: &str) -> bool {
        self.locations.is_empty()
            || self
                .locations
                .iter()
                .any(|l| l.eq_ignore_ascii_case(scope) || l.eq_ignore_ascii_case(ALL_SCOPE))
    }

    /// Variant spellings of an alias-bearing code.
    ///
    /// Non-alias-bearing codes yield nothing, and the code itself is never a
    /// variant of itself.
    pub fn miscode_variants(&self, scope: &str, code: &str) -> Vec<String> {
        let iso2 = self.lookup.iso2(scope).filter(|alias| !alias.is_empty());

        let alias_bearing = code.contains(scope) || iso2.is_some_and(|alias| code.contains(alias));
        if !alias_bearing {
            return Vec::new();
        }

        let stripped = code.replace('0', "");
        let mut variants = Vec::with_capacity(3);

        if let Some(alias) = iso2 {
            if stripped.contains(scope) {
                variants.push(stripped.replace(scope, alias));
            }
            if stripped.contains(alias) {
                variants.push(stripped.replace(alias, scope));
            }
        }
        variants.push(stripped);

        variants.retain(|variant| variant != code && !variant.is_empty());
        variants.sort();
        variants.dedup();
        variants
    }
}
