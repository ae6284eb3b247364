//! Tool domain entities

use super::value_objects::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Declarative description of a filter tool and the arguments it accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "search_by_keywords")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint ("string", "integer", "number", "boolean", "array")
    pub param_type: String,
    /// Element type for array parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            item_type: None,
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    /// Mark this parameter as an array of `item_type`.
    pub fn array_of(mut self, item_type: impl Into<String>) -> Self {
        self.param_type = "array".to_string();
        self.item_type = Some(item_type.into());
        self
    }
}

/// Arguments for one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolArgs {
    arguments: HashMap<String, Value>,
}

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object, e.g. arguments filled in by a model.
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(map) => Ok(Self {
                arguments: map.into_iter().collect(),
            }),
            other => Err(ToolError::invalid_argument(format!(
                "arguments must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.arguments.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.arguments.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.arguments.keys().map(String::as_str)
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument
    pub fn require_string(&self, key: &str) -> Result<&str, ToolError> {
        self.get_string(key)
            .ok_or_else(|| ToolError::invalid_argument(format!("Missing required argument: {key}")))
    }

    /// Get an optional i64 argument
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    /// Get an optional non-negative integer argument
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_u64())
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Get a list of strings; non-string elements are skipped.
    ///
    /// A single string is accepted as a one-element list.
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.arguments.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("search_by_keywords", "Keyword search")
            .with_parameter(ToolParameter::new("keywords", "Words to find", true).array_of("string"))
            .with_parameter(ToolParameter::new("top_n", "Rows to keep", false).with_type("integer"));

        assert_eq!(tool.parameters.len(), 2);
        assert!(tool.accepts("top_n"));
        assert!(!tool.accepts("limit"));
        assert_eq!(tool.parameter("keywords").unwrap().item_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_args_accessors() {
        let args = ToolArgs::new()
            .with_arg("keywords", json!(["delay", 3, "supplier"]))
            .with_arg("top_n", 5)
            .with_arg("column", "risk_text");

        assert_eq!(
            args.get_string_list("keywords").unwrap(),
            vec!["delay".to_string(), "supplier".to_string()]
        );
        assert_eq!(args.get_usize("top_n"), Some(5));
        assert_eq!(args.require_string("column").unwrap(), "risk_text");
        assert!(args.require_string("missing").is_err());
    }

    #[test]
    fn test_negative_usize_is_none() {
        let args = ToolArgs::new().with_arg("top_n", -2);
        assert_eq!(args.get_usize("top_n"), None);
        assert_eq!(args.get_i64("top_n"), Some(-2));
    }

    #[test]
    fn test_single_string_as_list() {
        let args = ToolArgs::new().with_arg("keywords", "budget");
        assert_eq!(args.get_string_list("keywords").unwrap(), vec!["budget".to_string()]);
    }

    #[test]
    fn test_from_value_requires_object() {
        assert!(ToolArgs::from_value(json!({"keywords": []})).is_ok());
        assert!(ToolArgs::from_value(json!(["x"])).is_err());
    }
}
