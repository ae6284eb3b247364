//! Tool domain value objects: execution output and errors

use crate::dataset::{Dataset, RelevanceMap};
use serde::{Deserialize, Serialize};

/// Error raised while preparing or validating a tool invocation.
///
/// Tools themselves never fail: malformed input yields an empty
/// [`ToolOutput`]. These errors cover argument handling around them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "INVALID_ARGUMENT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(tool: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Tool not found: {}", tool.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of running a filter tool over a dataset.
///
/// `dataset` holds a subset of the input rows under their original ids;
/// `relevance` scores some or all of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolOutput {
    pub dataset: Dataset,
    pub relevance: RelevanceMap,
}

impl ToolOutput {
    pub fn new(dataset: Dataset, relevance: RelevanceMap) -> Self {
        Self { dataset, relevance }
    }

    /// The input unchanged, unscored.
    pub fn identity(dataset: &Dataset) -> Self {
        Self::new(dataset.clone(), RelevanceMap::new())
    }

    /// No rows, unscored. Keeps the input's columns.
    pub fn empty(dataset: &Dataset) -> Self {
        Self::new(dataset.empty_like(), RelevanceMap::new())
    }
}
