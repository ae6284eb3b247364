//! Keyword search tool (`search_by_keywords`).
//!
//! Scores each row by the share of keywords found in one text column and
//! keeps the best `top_n`:
//!
//! ```text
//! score = matched keywords / total keywords      (rows with score 0 are dropped)
//! ```
//!
//! Text and keywords are normalized the same way before matching: lowercase,
//! every character that is not a letter, digit or whitespace replaced by a
//! space, whitespace runs collapsed. Matching is substring containment on the
//! normalized text, so a multi-word keyphrase matches only as a phrase.

use regex::Regex;
use std::sync::LazyLock;
use tabula_domain::{
    Dataset, FilterTool, RelevanceMap, RowId, ToolArgs, ToolDefinition, ToolOutput,
    ToolParameter,
};
use tracing::{debug, warn};

pub const NAME: &str = "search_by_keywords";

/// Column searched when the caller does not name one.
pub const DEFAULT_COLUMN: &str = "risk_text";

/// Rows kept when the caller does not say.
pub const DEFAULT_TOP_N: usize = 5;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{N}\s]+").expect("valid regex")
});

fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keyword relevance search over one text column.
pub struct KeywordSearchTool {
    definition: ToolDefinition,
}

impl Default for KeywordSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordSearchTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                NAME,
                "Find rows whose text mentions the given keywords, ranked by the share of keywords matched.",
            )
            .with_parameter(
                ToolParameter::new("keywords", "Keywords or short phrases to look for", true)
                    .array_of("string"),
            )
            .with_parameter(
                ToolParameter::new("top_n", "Maximum number of rows to return", false)
                    .with_type("integer"),
            )
            .with_parameter(ToolParameter::new(
                "column",
                "Text column to search (default: risk_text)",
                false,
            )),
        }
    }
}

impl FilterTool for KeywordSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn execute(&self, dataset: &Dataset, args: &ToolArgs) -> ToolOutput {
        let keywords: Vec<String> = args
            .get_string_list("keywords")
            .unwrap_or_default()
            .iter()
            .map(|k| normalize(k))
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            warn!("{}: no usable keywords", NAME);
            return ToolOutput::empty(dataset);
        }

        let column = args.get_string("column").unwrap_or(DEFAULT_COLUMN);
        if !dataset.has_column(column) {
            warn!("{}: column '{}' not found", NAME, column);
            return ToolOutput::empty(dataset);
        }

        let top_n = args.get_usize("top_n").unwrap_or(DEFAULT_TOP_N);
        let total = keywords.len() as f64;

        let mut scored: Vec<(RowId, f64)> = dataset
            .rows()
            .iter()
            .filter_map(|row| {
                let text = normalize(&row.text_or_empty(column));
                let matched = keywords.iter().filter(|k| text.contains(k.as_str())).count();
                (matched > 0).then(|| (row.id(), matched as f64 / total))
            })
            .collect();

        if scored.is_empty() {
            debug!(
                "{}: no row matched {:?}, returning the first {} rows",
                NAME, keywords, top_n
            );
            return ToolOutput::new(dataset.head(top_n), RelevanceMap::new());
        }

        // Stable: equal scores keep row order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);

        debug!(
            "{}: {} rows matched, keeping {}",
            NAME,
            scored.len(),
            top_n
        );
        let ids: Vec<RowId> = scored.iter().map(|(id, _)| *id).collect();
        ToolOutput::new(dataset.select(&ids), scored.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabula_domain::Cell;

    fn dataset() -> Dataset {
        Dataset::from_table(
            &["project_name", "risk_text"],
            vec![
                vec!["Alpha".into(), "Supplier delay, see contract №12".into()],
                vec!["Alpha".into(), "Budget overrun".into()],
                vec!["Beta".into(), "Supplier bankruptcy and DELAY of tooling".into()],
                vec!["Beta".into(), Cell::Null],
                vec!["Gamma".into(), "Late delivery from supplier".into()],
            ],
        )
    }

    fn args(keywords: serde_json::Value) -> ToolArgs {
        ToolArgs::new().with_arg("keywords", keywords)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Supplier-delay, (critical)!"), "supplier delay critical");
        assert_eq!(normalize("Задержка  ПОСТАВКИ"), "задержка поставки");
    }

    #[test]
    fn test_scores_by_share_of_keywords() {
        let out = KeywordSearchTool::new().execute(&dataset(), &args(json!(["supplier", "delay"])));

        assert_eq!(out.dataset.row_ids(), vec![RowId(0), RowId(2), RowId(4)]);
        assert_eq!(out.relevance.get(RowId(0)), Some(1.0));
        assert_eq!(out.relevance.get(RowId(2)), Some(1.0));
        assert_eq!(out.relevance.get(RowId(4)), Some(0.5));
        assert_eq!(out.relevance.get(RowId(1)), None);
    }

    #[test]
    fn test_top_n_keeps_best_scores() {
        let args = args(json!(["delay", "budget", "overrun"])).with_arg("top_n", 1);
        let out = KeywordSearchTool::new().execute(&dataset(), &args);

        assert_eq!(out.dataset.row_ids(), vec![RowId(1)]);
        assert!((out.relevance.get(RowId(1)).unwrap() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_match_returns_head_unscored() {
        let args = args(json!(["earthquake"])).with_arg("top_n", 2);
        let out = KeywordSearchTool::new().execute(&dataset(), &args);

        assert_eq!(out.dataset.row_ids(), vec![RowId(0), RowId(1)]);
        assert!(out.relevance.is_empty());
    }

    #[test]
    fn test_empty_keywords_return_empty() {
        let out = KeywordSearchTool::new().execute(&dataset(), &args(json!(["", "  ", "!!"])));
        assert!(out.dataset.is_empty());
        assert!(out.relevance.is_empty());
        assert_eq!(out.dataset.columns(), dataset().columns());
    }

    #[test]
    fn test_missing_column_returns_empty() {
        let args = args(json!(["delay"])).with_arg("column", "description");
        let out = KeywordSearchTool::new().execute(&dataset(), &args);
        assert!(out.dataset.is_empty());
    }

    #[test]
    fn test_custom_column() {
        let args = args(json!(["beta"])).with_arg("column", "project_name");
        let out = KeywordSearchTool::new().execute(&dataset(), &args);
        assert_eq!(out.dataset.row_ids(), vec![RowId(2), RowId(3)]);
    }

    #[test]
    fn test_output_rows_are_input_rows() {
        let ds = dataset().filter(|row| row.id() != RowId(0));
        let out = KeywordSearchTool::new().execute(&ds, &args(json!(["supplier"])));
        for id in out.dataset.row_ids() {
            assert!(ds.row(id).is_some());
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let ds = dataset();
        let before = ds.clone();
        KeywordSearchTool::new().execute(&ds, &args(json!(["delay"])));
        assert_eq!(ds, before);
    }
}
