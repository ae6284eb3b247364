//! Output formatter trait

use tabula_application::DatasetSummary;
use tabula_domain::{Answer, ToolDefinition};

/// Trait for formatting pipeline results
pub trait OutputFormatter {
    /// Format an answer for the terminal
    fn format(&self, answer: &Answer) -> String;

    /// Format an answer as JSON
    fn format_json(&self, answer: &Answer) -> String;

    /// Format the dataset listing
    fn format_datasets(&self, summaries: &[DatasetSummary]) -> String;

    /// Format the tool listing
    fn format_tools(&self, tools: &[ToolDefinition]) -> String;
}
