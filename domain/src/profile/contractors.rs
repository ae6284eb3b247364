//! Contractors dataset profile

use super::traits::{Compose, DatasetProfile, ExtractAxis, Normalize};
use crate::dataset::{DatasetType, Row};
use crate::pipeline::ExtraParams;
use crate::prompt::{PromptPair, PromptTemplate};
use crate::record::{Contractor, DomainRecord, RecordError};
use serde_json::{Map, Value};

const COLUMNS: &[(&str, &str)] = &[
    ("Наименование_КА", "name"),
    ("Виды_работ", "work_types"),
    ("Контактное_лицо", "contact_person"),
    ("Контакты", "contacts"),
    ("Сайт", "website"),
    ("Задействован_в_проекте", "projects"),
    ("Комментарий", "comments"),
    ("Первичная_информация", "primary_info"),
    ("Штат", "staff_size"),
];

/// Contractors are classified by the kind of work they do.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractorsProfile;

impl Normalize for ContractorsProfile {
    fn column_mapping(&self) -> &'static [(&'static str, &'static str)] {
        COLUMNS
    }
}

impl ExtractAxis for ContractorsProfile {
    fn axis_column(&self) -> &'static str {
        "work_types"
    }

    fn item_label(&self) -> &'static str {
        "work type"
    }
}

impl Compose for ContractorsProfile {
    fn entity_name(&self) -> &'static str {
        "contractors"
    }

    fn map_row(&self, row: &Row, relevance: Option<f64>) -> Result<DomainRecord, RecordError> {
        Contractor::from_row(row, relevance).map(DomainRecord::Contractor)
    }

    /// Contact sheets are sparse; empty fields are dropped.
    fn project(&self, record: &DomainRecord) -> Result<Map<String, Value>, RecordError> {
        let mut fields = record.to_fields()?;
        fields.retain(|_, v| !matches!(v, Value::String(s) if s.is_empty()));
        Ok(fields)
    }

    fn prompts(
        &self,
        question: &str,
        items: &[Map<String, Value>],
        additional_context: &str,
        _params: &ExtraParams,
    ) -> PromptPair {
        PromptTemplate::answer(
            "a professional analyst who selects contractors for construction and engineering projects",
            self.entity_name(),
            question,
            items,
            additional_context,
            "Include recommendations where appropriate",
        )
    }
}

impl DatasetProfile for ContractorsProfile {
    fn dataset_type(&self) -> DatasetType {
        DatasetType::Contractors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Cell, Dataset, RowId};

    #[test]
    fn test_normalize_renames_source_columns() {
        let raw = Dataset::from_table(
            &["Наименование_КА", "Виды_работ", "Штат"],
            vec![vec!["  ООО  Бетон ".into(), "Concrete works".into(), Cell::Number(40.0)]],
        );
        let ds = ContractorsProfile.normalize(raw);
        assert!(ds.has_column("name"));
        assert!(ds.has_column("work_types"));
        let row = &ds.rows()[0];
        assert_eq!(row.text("name").as_deref(), Some("ООО Бетон"));
        assert_eq!(row.text("staff_size").as_deref(), Some("40"));
    }

    #[test]
    fn test_project_drops_empty_fields() {
        let row = Row::new(RowId(0)).with("name", "Acme").with("website", "");
        let record = ContractorsProfile.map_row(&row, None).unwrap();
        let fields = ContractorsProfile.project(&record).unwrap();
        assert!(fields.contains_key("name"));
        assert!(!fields.contains_key("website"));
    }
}
