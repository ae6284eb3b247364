//! Dataset sources
//!
//! Adapters implementing [`DatasetSource`](tabula_application::DatasetSource).

mod in_memory;
mod json_file;

pub use in_memory::InMemoryDatasetSource;
pub use json_file::{JsonFileDatasetSource, parse_records};
