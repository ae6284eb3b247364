//! Processes dataset profile

use super::traits::{Compose, DatasetProfile, ExtractAxis, Normalize};
use crate::dataset::{DatasetType, Row};
use crate::pipeline::ExtraParams;
use crate::prompt::{PromptPair, PromptTemplate};
use crate::record::{DomainRecord, Process, RecordError};
use serde_json::{Map, Value};

const COLUMNS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("Название процесса", "name"),
    ("Описание", "description"),
    ("Файл JSON", "json_file"),
    ("Текстовое описание", "text_description"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessesProfile;

impl Normalize for ProcessesProfile {
    fn column_mapping(&self) -> &'static [(&'static str, &'static str)] {
        COLUMNS
    }
}

impl ExtractAxis for ProcessesProfile {
    fn axis_column(&self) -> &'static str {
        "name"
    }

    fn item_label(&self) -> &'static str {
        "business process"
    }
}

impl Compose for ProcessesProfile {
    fn entity_name(&self) -> &'static str {
        "processes"
    }

    fn map_row(&self, row: &Row, relevance: Option<f64>) -> Result<DomainRecord, RecordError> {
        Process::from_row(row, relevance).map(DomainRecord::Process)
    }

    fn prompts(
        &self,
        question: &str,
        items: &[Map<String, Value>],
        additional_context: &str,
        _params: &ExtraParams,
    ) -> PromptPair {
        PromptTemplate::answer(
            "a business process analyst",
            self.entity_name(),
            question,
            items,
            additional_context,
            "Describe the steps of the process clearly",
        )
    }
}

impl DatasetProfile for ProcessesProfile {
    fn dataset_type(&self) -> DatasetType {
        DatasetType::Processes
    }
}
