//! Per-dataset-type roles
//!
//! The pipeline engine runs the same stage sequence for every dataset type and
//! calls into these roles at its hook points. Each dataset type has one
//! concrete profile implementing all three.

use super::text::clean_cell;
use crate::dataset::{CandidateSet, Dataset, DatasetType, Row};
use crate::pipeline::ExtraParams;
use crate::prompt::PromptPair;
use crate::record::{DomainRecord, RecordError};
use serde_json::{Map, Value};

/// Column unification and text cleanup (stage 2).
pub trait Normalize: Send + Sync {
    /// Source column → canonical column pairs
    fn column_mapping(&self) -> &'static [(&'static str, &'static str)];

    /// Hook for dataset-specific derived columns. Runs after renaming and
    /// before text cleanup.
    fn post_process(&self, dataset: Dataset) -> Dataset {
        dataset
    }

    fn normalize(&self, dataset: Dataset) -> Dataset {
        let renamed = dataset.rename_columns(self.column_mapping());
        self.post_process(renamed).map_cells(clean_cell)
    }
}

/// Classification axis and optional sub-category restriction (stages 3 and 4).
pub trait ExtractAxis: Send + Sync {
    /// Default column whose distinct values form the candidate set
    fn axis_column(&self) -> &'static str;

    /// Singular noun for one axis value, used in prompts ("project")
    fn item_label(&self) -> &'static str;

    /// Restrict the dataset before extraction. Identity by default.
    fn pre_filter(&self, dataset: Dataset, _params: &ExtraParams) -> Dataset {
        dataset
    }

    fn extract(&self, dataset: &Dataset, column: &str) -> CandidateSet {
        CandidateSet::from_column(dataset, column)
    }
}

/// Record mapping and answer wording (stages 7 and 8).
pub trait Compose: Send + Sync {
    /// Plural noun for the records ("risks")
    fn entity_name(&self) -> &'static str;

    fn map_row(&self, row: &Row, relevance: Option<f64>) -> Result<DomainRecord, RecordError>;

    /// Key-value view of a record for the answer prompt
    fn project(&self, record: &DomainRecord) -> Result<Map<String, Value>, RecordError> {
        record.to_fields()
    }

    fn prompts(
        &self,
        question: &str,
        items: &[Map<String, Value>],
        additional_context: &str,
        params: &ExtraParams,
    ) -> PromptPair;

    fn additional_context(&self, found: usize, best_value: &str, _params: &ExtraParams) -> String {
        if best_value.is_empty() {
            format!("Found {} {}.", found, self.entity_name())
        } else {
            format!(
                "Found {} {} matching '{}'.",
                found,
                self.entity_name(),
                best_value
            )
        }
    }

    /// Deterministic answer text used when the model call fails
    fn fallback_text(&self, question: &str, count: usize, _params: &ExtraParams) -> String {
        format!(
            "By your request '{}' found {} {}.",
            question,
            count,
            self.entity_name()
        )
    }

    /// Answer text when there is nothing to classify against
    fn no_items_text(&self, question: &str) -> String {
        format!(
            "No {} found for your request '{}'.",
            self.entity_name(),
            question
        )
    }

    /// Category label recorded in answer metadata
    fn category(&self, _params: &ExtraParams) -> Option<String> {
        None
    }
}

/// Everything the engine needs to know about one dataset type.
pub trait DatasetProfile: Normalize + ExtractAxis + Compose {
    fn dataset_type(&self) -> DatasetType;
}
