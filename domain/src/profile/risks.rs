//! Risks dataset profile

use super::traits::{Compose, DatasetProfile, ExtractAxis, Normalize};
use crate::dataset::{Cell, Dataset, DatasetType, RiskCategory, Row};
use crate::pipeline::ExtraParams;
use crate::prompt::{PromptPair, PromptTemplate};
use crate::record::{DomainRecord, RecordError, Risk};
use serde_json::{Map, Value};

const COLUMNS: &[(&str, &str)] = &[
    ("№ проекта", "project_id"),
    ("Тип проекта", "project_type"),
    ("Наименование проекта", "project_name"),
    ("Риск", "risk_json"),
    ("Приоритетность", "risk_priority"),
    ("Текущий статус", "status"),
    ("Вероятность", "probability"),
    ("Серьезность последствий", "severity"),
    ("Предлагаемые меры", "proposed_measures"),
];

/// Risks are classified by project, within an optional project category.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisksProfile;

impl RisksProfile {
    pub fn category_display_name(category: RiskCategory) -> &'static str {
        match category {
            RiskCategory::Niokr => "R&D (research and development)",
            RiskCategory::ProductProject => "Product projects",
            RiskCategory::Manufacturing => "Manufacturing",
        }
    }
}

/// Risk cells hold JSON like `{"original": "...", ...}`; anything that does not
/// parse that way is taken as the risk text itself.
fn extract_risk_text(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => match map.get("original") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        },
        _ => raw.to_string(),
    }
}

impl Normalize for RisksProfile {
    fn column_mapping(&self) -> &'static [(&'static str, &'static str)] {
        COLUMNS
    }

    fn post_process(&self, dataset: Dataset) -> Dataset {
        if !dataset.has_column("risk_json") {
            return dataset;
        }
        dataset.derive_column("risk_text", |row| match row.get("risk_json") {
            Some(Cell::Text(raw)) => Cell::Text(extract_risk_text(raw)),
            Some(other) => other.clone(),
            None => Cell::Null,
        })
    }
}

impl ExtractAxis for RisksProfile {
    fn axis_column(&self) -> &'static str {
        "project_name"
    }

    fn item_label(&self) -> &'static str {
        "project"
    }

    fn pre_filter(&self, dataset: Dataset, params: &ExtraParams) -> Dataset {
        match params.risk_category {
            Some(category) => {
                dataset.filter(|row| row.text("project_type").as_deref() == Some(category.as_str()))
            }
            None => dataset,
        }
    }
}

impl Compose for RisksProfile {
    fn entity_name(&self) -> &'static str {
        "risks"
    }

    fn map_row(&self, row: &Row, relevance: Option<f64>) -> Result<DomainRecord, RecordError> {
        Risk::from_row(row, relevance).map(DomainRecord::Risk)
    }

    fn prompts(
        &self,
        question: &str,
        items: &[Map<String, Value>],
        additional_context: &str,
        params: &ExtraParams,
    ) -> PromptPair {
        let context = match params.risk_category {
            Some(category) => format!(
                "Project category: {}\n{}",
                Self::category_display_name(category),
                additional_context
            ),
            None => additional_context.to_string(),
        };
        PromptTemplate::answer(
            "an expert in project risk analysis across project types",
            self.entity_name(),
            question,
            items,
            &context,
            "Analyse priority and status, and recommend how to manage the risks",
        )
    }

    fn additional_context(&self, found: usize, best_value: &str, params: &ExtraParams) -> String {
        let category = params.risk_category.map(|c| c.as_str()).unwrap_or("");
        format!("Found {found} risks for project '{best_value}' in category '{category}'.")
    }

    fn fallback_text(&self, question: &str, count: usize, params: &ExtraParams) -> String {
        match params.risk_category {
            Some(category) => format!(
                "By your request '{question}' in category '{category}' found {count} risks."
            ),
            None => format!("By your request '{question}' found {count} risks."),
        }
    }

    fn category(&self, params: &ExtraParams) -> Option<String> {
        params.risk_category.map(|c| c.as_str().to_string())
    }
}

impl DatasetProfile for RisksProfile {
    fn dataset_type(&self) -> DatasetType {
        DatasetType::Risks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RowId;

    fn raw() -> Dataset {
        Dataset::from_table(
            &["Тип проекта", "Наименование проекта", "Риск"],
            vec![
                vec![
                    "niokr".into(),
                    "Alpha".into(),
                    r#"{"original": "Supplier  delay", "lemma": "supplier delay"}"#.into(),
                ],
                vec!["manufacturing".into(), "Beta".into(), "plain text risk".into()],
                vec!["niokr".into(), "Gamma".into(), Cell::Null],
            ],
        )
    }

    #[test]
    fn test_risk_text_extracted_from_json() {
        let ds = RisksProfile.normalize(raw());
        assert_eq!(ds.rows()[0].text("risk_text").as_deref(), Some("Supplier delay"));
        assert_eq!(ds.rows()[1].text("risk_text").as_deref(), Some("plain text risk"));
        assert!(ds.rows()[2].get("risk_text").unwrap().is_null());
    }

    #[test]
    fn test_extract_risk_text_without_original_key() {
        assert_eq!(extract_risk_text(r#"{"other": 1}"#), "");
        assert_eq!(extract_risk_text("[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_pre_filter_by_category() {
        let ds = RisksProfile.normalize(raw());
        let params = ExtraParams::new().with_risk_category(RiskCategory::Niokr);
        let filtered = RisksProfile.pre_filter(ds, &params);
        assert_eq!(filtered.row_ids(), vec![RowId(0), RowId(2)]);
    }

    #[test]
    fn test_pre_filter_without_category_is_identity() {
        let ds = RisksProfile.normalize(raw());
        let filtered = RisksProfile.pre_filter(ds.clone(), &ExtraParams::new());
        assert_eq!(filtered, ds);
    }

    #[test]
    fn test_context_and_fallback_mention_category() {
        let params = ExtraParams::new().with_risk_category(RiskCategory::ProductProject);
        assert_eq!(
            RisksProfile.additional_context(2, "Alpha", &params),
            "Found 2 risks for project 'Alpha' in category 'product_project'."
        );
        assert_eq!(
            RisksProfile.fallback_text("q", 2, &params),
            "By your request 'q' in category 'product_project' found 2 risks."
        );
    }
}
