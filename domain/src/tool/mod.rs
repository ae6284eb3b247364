//! Tool domain module
//!
//! A **tool** is a named, pluggable secondary filter applied after
//! classification. Each tool is described by a [`ToolDefinition`] (name and
//! parameter schema), invoked with [`ToolArgs`], and returns a [`ToolOutput`]
//! (filtered dataset plus per-row relevance).
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolRegistry │───▶│ FilterTool   │───▶│ ToolOutput   │
//! │ (read-only)  │    │ + ToolArgs   │    │ rows + score │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Architecture
//!
//! - **Domain** (this module): the contract, the registry, argument validation
//! - **Application** (`ToolExecutor`): strategy resolution and argument derivation
//! - **Infrastructure**: concrete tools and the explicit startup registration list

pub mod entities;
pub mod registry;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolArgs, ToolDefinition, ToolParameter};
pub use registry::{RegistryError, ToolRegistry};
pub use traits::{DefaultToolValidator, FilterTool, ToolValidator};
pub use value_objects::{ToolError, ToolOutput};
