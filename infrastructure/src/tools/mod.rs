//! Filter tool implementations
//!
//! Tools reduce a classified dataset further. Each one is a
//! [`FilterTool`](tabula_domain::FilterTool) registered by name; strategies in
//! the configuration refer to that name.
//!
//! ## Tools
//!
//! - `search_by_keywords`: keyword relevance search over a text column

pub mod keyword_search;
mod schema;

pub use keyword_search::KeywordSearchTool;
pub use schema::JsonSchemaToolConverter;

use std::sync::Arc;
use tabula_domain::{RegistryError, ToolRegistry};

/// Build the registry of every tool shipped with tabula.
pub fn default_registry() -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new().with_tool(Arc::new(KeywordSearchTool::new()))
}
