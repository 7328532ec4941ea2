//! Reference code table: canonical P-codes and their mis-coded variants.

mod country;
mod index;
mod source;

pub use country::{CountryLookup, CountryTable};
pub use index::{ALL_SCOPE, CodeIndex, CodeIndexBuilder, CodeRecord, ReferenceCodes};
pub use source::{CsvReferenceSource, ReferenceSource};
