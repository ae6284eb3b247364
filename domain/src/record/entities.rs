//! Typed projections of dataset rows

use crate::dataset::{DatasetType, Row};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to turn a row into a record, or a record into prompt fields.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("row {row} has no value for required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("relevance score {0} is not a finite number")]
    InvalidScore(f64),

    #[error("record cannot be serialized: {0}")]
    Unserializable(String),
}

fn required(row: &Row, field: &'static str) -> Result<String, RecordError> {
    row.text(field).ok_or(RecordError::MissingField {
        row: row.id().0,
        field,
    })
}

fn optional(row: &Row, field: &str) -> String {
    row.text_or_empty(field)
}

/// A contractor (supplier) and the work it does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contractor {
    pub name: String,
    pub work_types: String,
    pub contact_person: String,
    pub contacts: String,
    pub website: String,
    pub projects: String,
    pub comments: String,
    pub primary_info: String,
    pub staff_size: String,
    pub relevance_score: Option<f64>,
}

impl Contractor {
    pub fn from_row(row: &Row, relevance_score: Option<f64>) -> Result<Self, RecordError> {
        Ok(Self {
            name: required(row, "name")?,
            work_types: optional(row, "work_types"),
            contact_person: optional(row, "contact_person"),
            contacts: optional(row, "contacts"),
            website: optional(row, "website"),
            projects: optional(row, "projects"),
            comments: optional(row, "comments"),
            primary_info: optional(row, "primary_info"),
            staff_size: optional(row, "staff_size"),
            relevance_score,
        })
    }
}

/// A risk registered against a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub project_id: String,
    pub project_type: String,
    pub project_name: String,
    pub risk_text: String,
    pub risk_priority: String,
    pub status: String,
    pub proposed_measures: String,
    pub relevance_score: Option<f64>,
}

impl Risk {
    pub fn from_row(row: &Row, relevance_score: Option<f64>) -> Result<Self, RecordError> {
        Ok(Self {
            project_id: optional(row, "project_id"),
            project_type: optional(row, "project_type"),
            project_name: required(row, "project_name")?,
            risk_text: optional(row, "risk_text"),
            risk_priority: optional(row, "risk_priority"),
            status: optional(row, "status"),
            proposed_measures: optional(row, "proposed_measures"),
            relevance_score,
        })
    }
}

/// A mistake recorded during a project, with its cause and remedy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectError {
    pub date: String,
    pub responsible: String,
    pub subject: String,
    pub description: String,
    pub measures: String,
    pub reason: String,
    pub project: String,
    pub stage: String,
    pub category: String,
    pub relevance_score: Option<f64>,
}

impl ProjectError {
    pub fn from_row(row: &Row, relevance_score: Option<f64>) -> Result<Self, RecordError> {
        Ok(Self {
            date: optional(row, "date"),
            responsible: optional(row, "responsible"),
            subject: optional(row, "subject"),
            description: required(row, "description")?,
            measures: optional(row, "measures"),
            reason: optional(row, "reason"),
            project: optional(row, "project"),
            stage: optional(row, "stage"),
            category: optional(row, "category"),
            relevance_score,
        })
    }
}

/// A documented business process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    pub name: String,
    pub description: String,
    pub json_file: String,
    pub text_description: String,
    pub relevance_score: Option<f64>,
}

impl Process {
    pub fn from_row(row: &Row, relevance_score: Option<f64>) -> Result<Self, RecordError> {
        Ok(Self {
            id: optional(row, "id"),
            name: required(row, "name")?,
            description: optional(row, "description"),
            json_file: optional(row, "json_file"),
            text_description: optional(row, "text_description"),
            relevance_score,
        })
    }
}

/// One retained row, typed by its dataset. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainRecord {
    Contractor(Contractor),
    Risk(Risk),
    Error(ProjectError),
    Process(Process),
}

impl DomainRecord {
    pub fn dataset_type(&self) -> DatasetType {
        match self {
            DomainRecord::Contractor(_) => DatasetType::Contractors,
            DomainRecord::Risk(_) => DatasetType::Risks,
            DomainRecord::Error(_) => DatasetType::Errors,
            DomainRecord::Process(_) => DatasetType::Processes,
        }
    }

    pub fn relevance_score(&self) -> Option<f64> {
        match self {
            DomainRecord::Contractor(c) => c.relevance_score,
            DomainRecord::Risk(r) => r.relevance_score,
            DomainRecord::Error(e) => e.relevance_score,
            DomainRecord::Process(p) => p.relevance_score,
        }
    }

    /// Short human label used in fallback text and log previews.
    pub fn title(&self) -> &str {
        match self {
            DomainRecord::Contractor(c) => &c.name,
            DomainRecord::Risk(r) if !r.risk_text.is_empty() => &r.risk_text,
            DomainRecord::Risk(r) => &r.project_name,
            DomainRecord::Error(e) => &e.description,
            DomainRecord::Process(p) => &p.name,
        }
    }

    /// Serialize into a flat key-value object, without the `kind` tag.
    pub fn to_fields(&self) -> Result<Map<String, Value>, RecordError> {
        if let Some(score) = self.relevance_score()
            && !score.is_finite()
        {
            return Err(RecordError::InvalidScore(score));
        }
        let value = match self {
            DomainRecord::Contractor(c) => serde_json::to_value(c),
            DomainRecord::Risk(r) => serde_json::to_value(r),
            DomainRecord::Error(e) => serde_json::to_value(e),
            DomainRecord::Process(p) => serde_json::to_value(p),
        };
        match value {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(RecordError::Unserializable(format!(
                "expected an object, got {other}"
            ))),
            Err(e) => Err(RecordError::Unserializable(e.to_string())),
        }
    }
}
