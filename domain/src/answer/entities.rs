//! Answer: the terminal artifact of one request

use crate::dataset::DatasetType;
use crate::record::DomainRecord;
use serde::{Deserialize, Serialize};

/// Where the answer text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Prose written by the model
    Generated,
    /// Deterministic summary after the model call failed
    Fallback,
    /// Nothing to classify against; no model call made
    NoItems,
    /// A stage failed before composition
    PipelineError,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Generated => "generated",
            Provenance::Fallback => "fallback",
            Provenance::NoItems => "no_items",
            Provenance::PipelineError => "pipeline_error",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observability data attached to every [`Answer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerMetadata {
    pub dataset_type: DatasetType,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
}

impl AnswerMetadata {
    pub fn new(dataset_type: DatasetType, provenance: Provenance) -> Self {
        Self {
            dataset_type,
            provenance,
            category: None,
            best_value: None,
            strategy: None,
            request_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_best_value(mut self, value: impl Into<String>) -> Self {
        self.best_value = Some(value.into());
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub fn with_request_id(mut self, id: u64) -> Self {
        self.request_id = Some(id);
        self
    }
}

/// Final answer to one question. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub original_question: String,
    pub total_found: usize,
    pub records: Vec<DomainRecord>,
    pub metadata: AnswerMetadata,
}

impl Answer {
    /// An answer with explanatory text and no records.
    pub fn empty(
        text: impl Into<String>,
        question: impl Into<String>,
        metadata: AnswerMetadata,
    ) -> Self {
        Self {
            text: text.into(),
            original_question: question.into(),
            total_found: 0,
            records: Vec::new(),
            metadata,
        }
    }

    /// Keep at most `limit` records. `total_found` is unchanged.
    pub fn truncate_records(&mut self, limit: usize) {
        self.records.truncate(limit);
    }

    pub fn is_empty(&self) -> bool {
        self.total_found == 0
    }
}
