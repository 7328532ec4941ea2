//! Tabular normalization: recovering column keys from raw fragments.

mod normalizer;
mod table;

pub use normalizer::{FALLBACK_HEADER_DEPTH, Normalizer, TAG_SCAN_ROWS};
pub use table::{BailOut, COMPOSITE_SEPARATOR, HeaderLayout, NormalizedTable};
