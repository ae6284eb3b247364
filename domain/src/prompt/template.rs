//! Prompt templates for each model call in the pipeline

use serde_json::{Map, Value};

/// A system/user prompt pair for one model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Classification prompt: pick 1-3 candidates from a closed list.
    ///
    /// `delimited` must already carry the `<...>` wrapping used by the
    /// response constraint.
    pub fn classification(question: &str, item_label: &str, delimited: &[String]) -> PromptPair {
        let system = format!(
            r#"You are an expert at routing questions about {item_label}s.
Your task is to decide which {item_label} from the list below the user's question is most relevant to.

Possible values:
{values}

Steps:
1. Briefly reason about which values the question could refer to
2. Pick the 1 to 3 most relevant values and give each a score from 0 to 1

Rules:
1. Values are written strictly as '<value>'. Copy them exactly, including the angle brackets
2. Use each value at most once
3. Do not change spelling or case

Choose only from the list. Never invent a value."#,
            values = delimited.join(", ")
        );

        let example = delimited.first().map(String::as_str).unwrap_or("<value>");
        let user = format!(
            r#"User question: "{question}"

Which {item_label} is this question about?

Answer in the structured format, for example:
{{"reasoning": "The question mentions ...", "matches": [{{"value": "{example}", "score": 0.9}}]}}"#
        );

        PromptPair::new(system, user)
    }

    /// Answer prompt for the final prose.
    ///
    /// `analyst` describes the expert persona; `entity` is the plural noun for
    /// the records (e.g. "risks").
    pub fn answer(
        analyst: &str,
        entity: &str,
        question: &str,
        items: &[Map<String, Value>],
        additional_context: &str,
        focus: &str,
    ) -> PromptPair {
        let system = format!(
            r#"You are {analyst}.
Your task is to give an informative answer to the user's question about {entity} based on the data provided.

The answer must be:
1. Structured and informative
2. Focused on the key facts about the {entity}
3. Formatted as Markdown
4. {focus}

Do not include information that is not present in the data."#
        );

        let user = format!(
            r#"User question: "{question}"

{additional_context}

Data:

{data}
Write a detailed, informative answer to the user's question using the data above."#,
            data = Self::format_items(items)
        );

        PromptPair::new(system, user)
    }

    /// Render projected records as numbered Markdown blocks.
    ///
    /// Empty values and the relevance score are left out.
    pub fn format_items(items: &[Map<String, Value>]) -> String {
        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            out.push_str(&format!("### Item {}\n", i + 1));
            for (key, value) in item {
                if key == "relevance_score" {
                    continue;
                }
                let rendered = match value {
                    Value::String(s) if s.is_empty() => continue,
                    Value::String(s) => s.clone(),
                    Value::Null => continue,
                    other => other.to_string(),
                };
                out.push_str(&format!("**{key}**: {rendered}\n"));
            }
            out.push_str("\n---\n\n");
        }
        out
    }

    /// Prompt asking the model to fill a tool's parameters from the question.
    pub fn tool_arguments(question: &str, tool_name: &str, tool_description: &str) -> PromptPair {
        let system = format!(
            r#"You are a data analysis expert.
Fill in the arguments of the tool '{tool_name}' from the user's question.
Tool description: {tool_description}
Use only information present in the question."#
        );
        let user = format!("Question: {question}");
        PromptPair::new(system, user)
    }

    /// Prompt asking the model for search keyphrases.
    pub fn keyphrases(question: &str, max: usize) -> PromptPair {
        let system = format!(
            r#"You extract search keywords from questions.
Return up to {max} single words or short phrases that best capture what the user is looking for.
Leave out stop words, question words and generic verbs.
Order them from most to least important."#
        );
        let user = format!("Question: {question}");
        PromptPair::new(system, user)
    }
}
