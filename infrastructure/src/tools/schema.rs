//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that turns a
//! [`ToolDefinition`] into the object schema a model fills when it derives
//! tool arguments from a question.

use serde_json::{Map, Value, json};
use tabula_application::ports::tool_schema::ToolSchemaPort;
use tabula_domain::{ToolDefinition, ToolParameter};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - `"array"` → `"array"` with `items` from the item type
/// - anything else → `"string"`
pub struct JsonSchemaToolConverter;

fn scalar_type(param_type: &str) -> &'static str {
    match param_type {
        "number" => "number",
        "integer" => "integer",
        "boolean" => "boolean",
        _ => "string",
    }
}

fn property(param: &ToolParameter) -> Value {
    let mut prop = Map::new();
    if param.param_type == "array" {
        let item_type = scalar_type(param.item_type.as_deref().unwrap_or("string"));
        prop.insert("type".to_string(), json!("array"));
        prop.insert("items".to_string(), json!({ "type": item_type }));
    } else {
        prop.insert("type".to_string(), json!(scalar_type(&param.param_type)));
    }
    prop.insert("description".to_string(), json!(param.description));
    Value::Object(prop)
}

impl JsonSchemaToolConverter {
    /// Name, description and parameter schema together, for listings.
    pub fn describe(&self, tool: &ToolDefinition) -> Value {
        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": self.parameters_schema(tool),
        })
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn parameters_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            properties.insert(param.name.clone(), property(param));
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}
