//! Tool registry
//!
//! Populated once at startup and then shared read-only (behind an `Arc`) by
//! every request. There is no removal and no mutation after construction.

use super::entities::ToolDefinition;
use super::traits::FilterTool;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Tool name must not be empty")]
    EmptyName,
}

/// Lookup of named filter tools
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn FilterTool>>,
    /// Registration order, for stable listing
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails if the name is already taken.
    pub fn register(&mut self, tool: Arc<dyn FilterTool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_tool(mut self, tool: Arc<dyn FilterTool>) -> Result<Self, RegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn FilterTool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tools in registration order.
    pub fn list(&self) -> Vec<Arc<dyn FilterTool>> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name).cloned())
            .collect()
    }

    /// The tools among `names` that are registered, in the order given.
    pub fn list_by_name(&self, names: &[&str]) -> Vec<Arc<dyn FilterTool>> {
        names.iter().filter_map(|name| self.get(name)).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.list().iter().map(|t| t.definition().clone()).collect()
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::tool::entities::ToolArgs;
    use crate::tool::value_objects::ToolOutput;

    struct NamedTool(ToolDefinition);

    impl NamedTool {
        fn new(name: &str) -> Arc<dyn FilterTool> {
            Arc::new(Self(ToolDefinition::new(name, "test tool")))
        }
    }

    impl FilterTool for NamedTool {
        fn definition(&self) -> &ToolDefinition {
            &self.0
        }

        fn execute(&self, dataset: &Dataset, _args: &ToolArgs) -> ToolOutput {
            ToolOutput::identity(dataset)
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new()
            .with_tool(NamedTool::new("search_by_keywords"))
            .unwrap();
        assert!(registry.get("search_by_keywords").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_collision_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(NamedTool::new("a")).unwrap();
        assert_eq!(
            registry.register(NamedTool::new("a")),
            Err(RegistryError::DuplicateTool("a".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_empty_name_fails() {
        let mut registry = ToolRegistry::new();
        assert_eq!(registry.register(NamedTool::new(" ")), Err(RegistryError::EmptyName));
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let registry = ToolRegistry::new()
            .with_tool(NamedTool::new("b"))
            .and_then(|r| r.with_tool(NamedTool::new("a")))
            .and_then(|r| r.with_tool(NamedTool::new("c")))
            .unwrap();
        let names: Vec<_> = registry.list().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_list_by_name_skips_unknown() {
        let registry = ToolRegistry::new()
            .with_tool(NamedTool::new("a"))
            .and_then(|r| r.with_tool(NamedTool::new("b")))
            .unwrap();
        let names: Vec<_> = registry
            .list_by_name(&["b", "zzz", "a"])
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
