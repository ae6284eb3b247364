//! Tool domain traits
//!
//! [`FilterTool`] is the execution contract every registered tool implements.
//! It is synchronous and pure: the async work (argument derivation, model
//! calls) happens in the application layer before a tool is invoked.

use super::entities::{ToolArgs, ToolDefinition};
use super::value_objects::{ToolError, ToolOutput};
use crate::dataset::Dataset;

/// A named secondary filter over a dataset.
///
/// Implementations must:
/// - never mutate `dataset` (they only get a shared reference)
/// - return [`ToolOutput::empty`] on empty or malformed input instead of failing
/// - keep row ids: every output row is an input row under the same [`RowId`](crate::dataset::RowId)
pub trait FilterTool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    fn execute(&self, dataset: &Dataset, args: &ToolArgs) -> ToolOutput;

    fn name(&self) -> &str {
        &self.definition().name
    }
}

/// Validator for tool arguments
pub trait ToolValidator {
    /// Validate arguments against a definition
    fn validate(&self, args: &ToolArgs, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Checks required parameters are present and no unknown ones are passed.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, args: &ToolArgs, definition: &ToolDefinition) -> Result<(), ToolError> {
        for param in &definition.parameters {
            if param.required && !args.contains(&param.name) {
                return Err(ToolError::invalid_argument(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                )));
            }
        }

        if let Some(unknown) = args.keys().find(|key| !definition.accepts(key)) {
            return Err(ToolError::invalid_argument(format!(
                "Unknown parameter '{}' for tool '{}'",
                unknown, definition.name
            )));
        }

        Ok(())
    }
}
