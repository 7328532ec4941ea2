//! Input handling: catalog descriptors, resource acquisition, and fragment reading.

mod acquire;
mod catalog;
mod fragment;
mod reader;

pub use acquire::{Acquired, DataAcquirer, FileAcquirer};
pub use catalog::{API_RESOURCE_TYPE, Dataset, Resource};
pub use fragment::{
    FileFormat, FragmentSource, PLACEHOLDER_PREFIX, RawFragment, SchemaHint, is_empty_cell,
    is_placeholder, placeholder_name,
};
pub use reader::{FragmentReader, content_hash};
