//! Pipeline stages

use serde::{Deserialize, Serialize};

/// The fixed stage sequence of one pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Normalize,
    PreFilter,
    ExtractCandidates,
    Classify,
    Filter,
    MapRecords,
    Compose,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Load,
        Stage::Normalize,
        Stage::PreFilter,
        Stage::ExtractCandidates,
        Stage::Classify,
        Stage::Filter,
        Stage::MapRecords,
        Stage::Compose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Normalize => "normalize",
            Stage::PreFilter => "pre_filter",
            Stage::ExtractCandidates => "extract_candidates",
            Stage::Classify => "classify",
            Stage::Filter => "filter",
            Stage::MapRecords => "map_records",
            Stage::Compose => "compose",
        }
    }

    /// 1-based position in the sequence
    pub fn number(&self) -> usize {
        Stage::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
