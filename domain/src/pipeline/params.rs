//! Per-request parameters beyond the question itself

use crate::dataset::RiskCategory;
use serde::{Deserialize, Serialize};

/// Optional knobs supplied by the caller with a question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraParams {
    /// Restricts the risks dataset to one project type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_category: Option<RiskCategory>,
    /// Rows a tool should keep; overrides the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
    /// Maximum records returned in the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ExtraParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_risk_category(mut self, category: RiskCategory) -> Self {
        self.risk_category = Some(category);
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
