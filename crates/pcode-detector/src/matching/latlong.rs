//! Latitude/longitude column pair detection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::is_empty_cell;
use crate::normalize::{COMPOSITE_SEPARATOR, NormalizedTable};

use super::patterns::{
    LATITUDE_HEADER, LATITUDE_VALUE, LONGITUDE_HEADER, LONGITUDE_VALUE, PatternTable,
};

/// Non-matching values a coordinate column may contain and still pass.
pub const NON_MATCH_TOLERANCE: usize = 5;

/// Coordinate role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn header_patterns(self) -> &'static PatternTable {
        match self {
            Axis::Latitude => &*LATITUDE_HEADER,
            Axis::Longitude => &*LONGITUDE_HEADER,
        }
    }

    fn value_patterns(self) -> &'static PatternTable {
        match self {
            Axis::Latitude => &*LATITUDE_VALUE,
            Axis::Longitude => &*LONGITUDE_VALUE,
        }
    }
}

/// Value counts for one column checked against one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisCheck {
    pub axis: Axis,
    pub column: String,
    pub matched: usize,
    pub unmatched: usize,
}

impl AxisCheck {
    pub fn passes(&self, tolerance: usize) -> bool {
        self.matched > 0 && self.unmatched <= tolerance
    }
}

/// A confirmed latitude/longitude column pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePair {
    pub latitude: AxisCheck,
    pub longitude: AxisCheck,
}

/// Finds a latitude column and a longitude column that each hold
/// recognizable coordinate values.
#[derive(Debug, Clone)]
pub struct LatLongMatcher {
    tolerance: usize,
}

impl Default for LatLongMatcher {
    fn default() -> Self {
        Self {
            tolerance: NON_MATCH_TOLERANCE,
        }
    }
}

impl LatLongMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: usize) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Check a column against an axis. Returns `None` if no header fragment
    /// names that axis.
    pub fn check_column(&self, table: &NormalizedTable, index: usize, axis: Axis) -> Option<AxisCheck> {
        let key = table.columns.get(index)?;
        if !axis.header_patterns().matches_any(key.split(COMPOSITE_SEPARATOR)) {
            return None;
        }

        let values = axis.value_patterns();
        let (mut matched, mut unmatched) = (0, 0);
        for value in table.column_values(index).filter(|v| !is_empty_cell(v)) {
            if values.is_match(value.trim()) {
                matched += 1;
            } else {
                unmatched += 1;
            }
        }

        Some(AxisCheck {
            axis,
            column: key.clone(),
            matched,
            unmatched,
        })
    }

    /// First passing latitude column and first passing longitude column.
    pub fn find(&self, table: &NormalizedTable) -> Option<CoordinatePair> {
        let mut latitude = None;
        let mut longitude = None;

        for index in 0..table.column_count() {
            for axis in [Axis::Latitude, Axis::Longitude] {
                let slot = match axis {
                    Axis::Latitude => &mut latitude,
                    Axis::Longitude => &mut longitude,
                };
                if slot.is_some() {
                    continue;
                }
                if let Some(check) = self.check_column(table, index, axis) {
                    debug!(
                        column = %check.column,
                        ?axis,
                        matched = check.matched,
                        unmatched = check.unmatched,
                        "checked coordinate column"
                    );
                    if check.passes(self.tolerance) {
                        *slot = Some(check);
                    }
                }
            }

            if let (Some(lat), Some(lon)) = (&latitude, &longitude) {
                return Some(CoordinatePair {
                    latitude: lat.clone(),
                    longitude: lon.clone(),
                });
            }
        }
        None
    }

    pub fn is_latlong(&self, table: &NormalizedTable) -> bool {
        self.find(table).is_some()
    }
}
