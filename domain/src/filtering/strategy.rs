//! Filter strategy selection
//!
//! Two lookups, both pure data:
//!
//! ```text
//! DatasetType ──bindings──▶ strategy name ──tools──▶ tool name
//!   risks                     "keyword"                "search_by_keywords"
//!   errors                    "none"                   (Direct)
//! ```
//!
//! Binding a new dataset type to a tool is a configuration change only.

use crate::dataset::DatasetType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Strategy name meaning "use the classifier result directly".
pub const NONE_STRATEGY: &str = "none";

/// How a dataset type's classified rows get reduced further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStrategy {
    /// No secondary step
    Direct,
    /// Delegate to a registered tool
    ToolBound { strategy: String, tool: String },
}

impl FilterStrategy {
    pub fn name(&self) -> &str {
        match self {
            FilterStrategy::Direct => NONE_STRATEGY,
            FilterStrategy::ToolBound { strategy, .. } => strategy.as_str(),
        }
    }

    pub fn tool(&self) -> Option<&str> {
        match self {
            FilterStrategy::Direct => None,
            FilterStrategy::ToolBound { tool, .. } => Some(tool.as_str()),
        }
    }
}

impl std::fmt::Display for FilterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterStrategy::Direct => write!(f, "{}", NONE_STRATEGY),
            FilterStrategy::ToolBound { strategy, tool } => write!(f, "{strategy} ({tool})"),
        }
    }
}

/// Where a tool-bound strategy gets its arguments from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentSource {
    /// Keyphrases extracted from the question
    #[default]
    Keyphrases,
    /// The model fills the tool's parameter schema from the question
    Model,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("strategy '{strategy}' for dataset '{dataset}' is not bound to any tool")]
    UnboundStrategy {
        dataset: DatasetType,
        strategy: String,
    },
}

/// Immutable strategy configuration shared by every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyBindings {
    by_dataset: HashMap<DatasetType, String>,
    tools: HashMap<String, String>,
    argument_sources: HashMap<String, ArgumentSource>,
}

impl StrategyBindings {
    /// No bindings: every dataset type resolves to [`FilterStrategy::Direct`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Risks use keyword search; the rest stay direct.
    pub fn defaults() -> Self {
        Self::new()
            .bind_dataset(DatasetType::Risks, "keyword")
            .bind_tool("keyword", "search_by_keywords")
    }

    pub fn bind_dataset(mut self, dataset: DatasetType, strategy: impl Into<String>) -> Self {
        self.by_dataset.insert(dataset, strategy.into());
        self
    }

    pub fn bind_tool(mut self, strategy: impl Into<String>, tool: impl Into<String>) -> Self {
        self.tools.insert(strategy.into(), tool.into());
        self
    }

    pub fn with_argument_source(mut self, strategy: impl Into<String>, source: ArgumentSource) -> Self {
        self.argument_sources.insert(strategy.into(), source);
        self
    }

    /// Strategy name configured for `dataset`, `"none"` when unset.
    pub fn strategy_name(&self, dataset: DatasetType) -> &str {
        self.by_dataset
            .get(&dataset)
            .map(String::as_str)
            .unwrap_or(NONE_STRATEGY)
    }

    pub fn argument_source(&self, strategy: &str) -> ArgumentSource {
        self.argument_sources.get(strategy).copied().unwrap_or_default()
    }

    /// Tool bound to a strategy name.
    pub fn tool_for(&self, strategy: &str) -> Option<&str> {
        self.tools.get(strategy).map(String::as_str)
    }

    /// Resolve the strategy for a dataset type.
    ///
    /// A strategy name other than `none` with no tool binding is a
    /// configuration error.
    pub fn resolve(&self, dataset: DatasetType) -> Result<FilterStrategy, StrategyError> {
        let strategy = self.strategy_name(dataset);
        if strategy == NONE_STRATEGY {
            return Ok(FilterStrategy::Direct);
        }
        match self.tool_for(strategy) {
            Some(tool) => Ok(FilterStrategy::ToolBound {
                strategy: strategy.to_string(),
                tool: tool.to_string(),
            }),
            None => Err(StrategyError::UnboundStrategy {
                dataset,
                strategy: strategy.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bind_only_risks() {
        let bindings = StrategyBindings::defaults();
        assert_eq!(
            bindings.resolve(DatasetType::Risks).unwrap(),
            FilterStrategy::ToolBound {
                strategy: "keyword".to_string(),
                tool: "search_by_keywords".to_string()
            }
        );
        for dataset in [DatasetType::Contractors, DatasetType::Errors, DatasetType::Processes] {
            assert_eq!(bindings.resolve(dataset).unwrap(), FilterStrategy::Direct);
        }
    }

    #[test]
    fn test_binding_is_data_driven() {
        let bindings = StrategyBindings::defaults().bind_dataset(DatasetType::Errors, "keyword");
        assert_eq!(
            bindings.resolve(DatasetType::Errors).unwrap().tool(),
            Some("search_by_keywords")
        );
    }

    #[test]
    fn test_explicit_none_is_direct() {
        let bindings = StrategyBindings::defaults().bind_dataset(DatasetType::Risks, "none");
        assert_eq!(bindings.resolve(DatasetType::Risks).unwrap(), FilterStrategy::Direct);
    }

    #[test]
    fn test_unbound_strategy_is_error() {
        let bindings = StrategyBindings::new().bind_dataset(DatasetType::Processes, "semantic");
        assert!(matches!(
            bindings.resolve(DatasetType::Processes),
            Err(StrategyError::UnboundStrategy { .. })
        ));
    }

    #[test]
    fn test_argument_source_defaults_to_keyphrases() {
        let bindings = StrategyBindings::defaults().with_argument_source("llm", ArgumentSource::Model);
        assert_eq!(bindings.argument_source("keyword"), ArgumentSource::Keyphrases);
        assert_eq!(bindings.argument_source("llm"), ArgumentSource::Model);
    }
}
