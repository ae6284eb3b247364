//! Tool schema conversion port.
//!
//! The domain defines [`ToolDefinition`]; this port turns one into the JSON
//! Schema a model needs in order to fill the tool's arguments.

use tabula_domain::ToolDefinition;

/// Port for converting tool definitions to JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    /// Object schema describing the tool's parameters.
    fn parameters_schema(&self, tool: &ToolDefinition) -> serde_json::Value;
}
