//! Dataset types and the risk sub-category

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the fixed categories of source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Contractors,
    Risks,
    Errors,
    Processes,
}

impl DatasetType {
    pub const ALL: [DatasetType; 4] = [
        DatasetType::Contractors,
        DatasetType::Risks,
        DatasetType::Errors,
        DatasetType::Processes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Contractors => "contractors",
            DatasetType::Risks => "risks",
            DatasetType::Errors => "errors",
            DatasetType::Processes => "processes",
        }
    }
}

impl std::fmt::Display for DatasetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contractors" => Ok(DatasetType::Contractors),
            "risks" => Ok(DatasetType::Risks),
            "errors" => Ok(DatasetType::Errors),
            "processes" => Ok(DatasetType::Processes),
            other => Err(DomainError::UnknownDatasetType(other.to_string())),
        }
    }
}

/// Sub-category used to pre-filter the risks dataset by `project_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Niokr,
    ProductProject,
    Manufacturing,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Niokr => "niokr",
            RiskCategory::ProductProject => "product_project",
            RiskCategory::Manufacturing => "manufacturing",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "niokr" => Ok(RiskCategory::Niokr),
            "product_project" => Ok(RiskCategory::ProductProject),
            "manufacturing" => Ok(RiskCategory::Manufacturing),
            other => Err(DomainError::UnknownRiskCategory(other.to_string())),
        }
    }
}
