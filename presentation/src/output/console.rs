//! Console output formatter for answers and listings

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use serde::Serialize;
use tabula_application::DatasetSummary;
use tabula_domain::{Answer, Provenance, ToolDefinition};

/// Formats pipeline results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a complete answer: header, prose, then a metadata footer
    pub fn format(answer: &Answer) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!(
            "Answer ({})",
            answer.metadata.dataset_type
        )));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            answer.original_question
        ));

        output.push_str(answer.text.trim_end());
        output.push('\n');

        output.push_str(&Self::section_header("Details"));
        output.push_str(&format!(
            "{} {} (showing {})\n",
            "Found:".dimmed(),
            answer.total_found,
            answer.records.len()
        ));
        if let Some(best) = &answer.metadata.best_value {
            output.push_str(&format!("{} {}\n", "Matched:".dimmed(), best));
        }
        if let Some(category) = &answer.metadata.category {
            output.push_str(&format!("{} {}\n", "Category:".dimmed(), category));
        }
        if let Some(strategy) = &answer.metadata.strategy {
            output.push_str(&format!("{} {}\n", "Strategy:".dimmed(), strategy));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Source:".dimmed(),
            Self::provenance_label(answer.metadata.provenance)
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format any serializable value as pretty JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_datasets(summaries: &[DatasetSummary]) -> String {
        let mut output = Self::section_header("Datasets");
        for summary in summaries {
            let strategy = match &summary.tool {
                Some(tool) => format!("{} -> {}", summary.strategy, tool),
                None => summary.strategy.clone(),
            };
            output.push_str(&format!(
                "  {:<12} axis: {:<14} strategy: {}\n",
                summary.dataset.to_string().bold(),
                summary.axis,
                strategy
            ));
            match (&summary.error, summary.rows, summary.candidates) {
                (Some(error), _, _) => {
                    output.push_str(&format!("  {:<12} {}\n", "", error.red()));
                }
                (None, Some(rows), Some(candidates)) => {
                    output.push_str(&format!(
                        "  {:<12} {}\n",
                        "",
                        format!("{rows} rows, {candidates} distinct values").dimmed()
                    ));
                }
                _ => {}
            }
        }
        output
    }

    pub fn format_tools(tools: &[ToolDefinition]) -> String {
        let mut output = Self::section_header("Tools");
        for tool in tools {
            output.push_str(&format!(
                "  {}\n    {}\n",
                tool.name.bold(),
                tool.description
            ));
            for param in &tool.parameters {
                let kind = match &param.item_type {
                    Some(item) => format!("{}<{}>", param.param_type, item),
                    None => param.param_type.clone(),
                };
                let required = if param.required { " (required)" } else { "" };
                output.push_str(&format!(
                    "    - {}: {}{} {}\n",
                    param.name.cyan(),
                    kind,
                    required.yellow(),
                    param.description.dimmed()
                ));
            }
        }
        output
    }

    fn provenance_label(provenance: Provenance) -> String {
        match provenance {
            Provenance::Generated => "model".green().to_string(),
            Provenance::Fallback => "fallback summary (model unavailable)".yellow().to_string(),
            Provenance::NoItems => "no items".yellow().to_string(),
            Provenance::PipelineError => "pipeline error".red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, answer: &Answer) -> String {
        Self::format(answer)
    }

    fn format_json(&self, answer: &Answer) -> String {
        Self::format_json(answer)
    }

    fn format_datasets(&self, summaries: &[DatasetSummary]) -> String {
        Self::format_datasets(summaries)
    }

    fn format_tools(&self, tools: &[ToolDefinition]) -> String {
        Self::format_tools(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_domain::{AnswerMetadata, DatasetType, ToolParameter};

    fn answer() -> Answer {
        Answer {
            text: "Two supplier risks were found.".to_string(),
            original_question: "supplier risks in Alpha?".to_string(),
            total_found: 2,
            records: Vec::new(),
            metadata: AnswerMetadata::new(DatasetType::Risks, Provenance::Generated)
                .with_best_value("Alpha")
                .with_strategy("keyword"),
        }
    }

    #[test]
    fn test_format_answer() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&answer());

        assert!(text.contains("Answer (risks)"));
        assert!(text.contains("Question: supplier risks in Alpha?"));
        assert!(text.contains("Two supplier risks were found."));
        assert!(text.contains("Found: 2 (showing 0)"));
        assert!(text.contains("Matched: Alpha"));
        assert!(text.contains("Strategy: keyword"));
        assert!(!text.contains("Category:"));
    }

    #[test]
    fn test_format_json() {
        let json = ConsoleFormatter::format_json(&answer());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_found"], 2);
        assert_eq!(value["metadata"]["provenance"], "generated");
        assert_eq!(value["metadata"]["dataset_type"], "risks");
    }

    #[test]
    fn test_format_tools() {
        colored::control::set_override(false);
        let tool = ToolDefinition::new("search_by_keywords", "Keyword search").with_parameter(
            ToolParameter::new("keywords", "Words", true).array_of("string"),
        );
        let text = ConsoleFormatter::format_tools(&[tool]);
        assert!(text.contains("search_by_keywords"));
        assert!(text.contains("- keywords: array<string> (required) Words"));
    }

    #[test]
    fn test_format_datasets() {
        colored::control::set_override(false);
        let summaries = vec![DatasetSummary {
            dataset: DatasetType::Errors,
            axis: "project".to_string(),
            strategy: "none".to_string(),
            tool: None,
            rows: None,
            candidates: None,
            error: Some("Dataset 'errors' is unavailable: missing".to_string()),
        }];
        let text = ConsoleFormatter::format_datasets(&summaries);
        assert!(text.contains("errors"));
        assert!(text.contains("strategy: none"));
        assert!(text.contains("unavailable"));
    }
}
