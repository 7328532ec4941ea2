//! Column matchers: P-code columns and coordinate column pairs.

mod latlong;
pub mod patterns;
mod pcode;

pub use latlong::{Axis, AxisCheck, CoordinatePair, LatLongMatcher, NON_MATCH_TOLERANCE};
pub use patterns::PatternTable;
pub use pcode::{ColumnMatch, MATCH_THRESHOLD, MatchMode, NULL_TOKENS, PcodeMatcher};
