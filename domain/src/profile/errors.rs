//! Errors dataset profile

use super::traits::{Compose, DatasetProfile, ExtractAxis, Normalize};
use crate::dataset::{DatasetType, Row};
use crate::pipeline::ExtraParams;
use crate::prompt::{PromptPair, PromptTemplate};
use crate::record::{DomainRecord, ProjectError, RecordError};
use serde_json::{Map, Value};

const COLUMNS: &[(&str, &str)] = &[
    ("дата фиксации", "date"),
    ("ответственный", "responsible"),
    ("предмет ошибки", "subject"),
    ("описание ошибки", "description"),
    ("предпринятые меры", "measures"),
    ("причина", "reason"),
    ("проект", "project"),
    ("стадия проекта", "stage"),
    ("категория", "category"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorsProfile;

impl Normalize for ErrorsProfile {
    fn column_mapping(&self) -> &'static [(&'static str, &'static str)] {
        COLUMNS
    }
}

impl ExtractAxis for ErrorsProfile {
    fn axis_column(&self) -> &'static str {
        "project"
    }

    fn item_label(&self) -> &'static str {
        "project"
    }
}

impl Compose for ErrorsProfile {
    fn entity_name(&self) -> &'static str {
        "errors"
    }

    fn map_row(&self, row: &Row, relevance: Option<f64>) -> Result<DomainRecord, RecordError> {
        ProjectError::from_row(row, relevance).map(DomainRecord::Error)
    }

    fn prompts(
        &self,
        question: &str,
        items: &[Map<String, Value>],
        additional_context: &str,
        _params: &ExtraParams,
    ) -> PromptPair {
        PromptTemplate::answer(
            "an expert in analysing mistakes made during projects",
            self.entity_name(),
            question,
            items,
            additional_context,
            "Recommend how to prevent similar errors",
        )
    }
}

impl DatasetProfile for ErrorsProfile {
    fn dataset_type(&self) -> DatasetType {
        DatasetType::Errors
    }
}
