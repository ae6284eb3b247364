//! Pipeline parameters: per-request behavior shared by every run.
//!
//! [`PipelineConfig`] is built once at startup (from the layered config file
//! in the infrastructure layer) and shared read-only between concurrent
//! requests.

use std::collections::HashMap;
use std::time::Duration;
use tabula_domain::{DatasetType, StrategyBindings};

/// Maximum records returned when neither the request nor the config sets one.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Pipeline behavior configuration.
///
/// | Field | Default |
/// |-------|---------|
/// | `answer_temperature` | 0.2 |
/// | `classification_retries` | 1 |
/// | `default_top_n` | 5 |
/// | `keyphrase_count` | 7 |
/// | `llm_timeout` | 120s |
/// | `load_timeout` | 30s |
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Dataset type → strategy → tool bindings
    pub strategies: StrategyBindings,
    /// Replacement classification axis per dataset type
    pub axis_overrides: HashMap<DatasetType, String>,
    /// Records kept in the answer per dataset type
    pub max_results: HashMap<DatasetType, usize>,
    /// Sampling temperature for the answer call. Classification always uses 0.
    pub answer_temperature: f32,
    /// Extra classification attempts after a shape violation
    pub classification_retries: u32,
    /// Rows kept by a tool when the request does not say
    pub default_top_n: usize,
    /// Keyphrases requested for keyword-driven tools
    pub keyphrase_count: usize,
    /// Upper bound on any single model call
    pub llm_timeout: Option<Duration>,
    /// Upper bound on loading one dataset
    pub load_timeout: Option<Duration>,
    /// Write full prompts to the event log
    pub log_prompts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strategies: StrategyBindings::defaults(),
            axis_overrides: HashMap::new(),
            max_results: HashMap::new(),
            answer_temperature: 0.2,
            classification_retries: 1,
            default_top_n: 5,
            keyphrase_count: 7,
            llm_timeout: Some(Duration::from_secs(120)),
            load_timeout: Some(Duration::from_secs(30)),
            log_prompts: false,
        }
    }
}

impl PipelineConfig {
    // ==================== Builder Methods ====================

    pub fn with_strategies(mut self, strategies: StrategyBindings) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_axis(mut self, dataset: DatasetType, column: impl Into<String>) -> Self {
        self.axis_overrides.insert(dataset, column.into());
        self
    }

    pub fn with_max_results(mut self, dataset: DatasetType, max: usize) -> Self {
        self.max_results.insert(dataset, max);
        self
    }

    pub fn with_answer_temperature(mut self, temperature: f32) -> Self {
        self.answer_temperature = temperature;
        self
    }

    pub fn with_classification_retries(mut self, retries: u32) -> Self {
        self.classification_retries = retries;
        self
    }

    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n;
        self
    }

    pub fn with_keyphrase_count(mut self, count: usize) -> Self {
        self.keyphrase_count = count;
        self
    }

    pub fn with_llm_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn with_load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn with_log_prompts(mut self, enabled: bool) -> Self {
        self.log_prompts = enabled;
        self
    }

    // ==================== Lookups ====================

    /// Classification axis for `dataset`: the override if set, else `default`.
    pub fn axis_for<'a>(&'a self, dataset: DatasetType, default: &'a str) -> &'a str {
        self.axis_overrides
            .get(&dataset)
            .map(String::as_str)
            .unwrap_or(default)
    }

    pub fn max_results_for(&self, dataset: DatasetType) -> usize {
        self.max_results
            .get(&dataset)
            .copied()
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!((config.answer_temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.classification_retries, 1);
        assert_eq!(config.default_top_n, 5);
        assert_eq!(config.keyphrase_count, 7);
        assert_eq!(config.max_results_for(DatasetType::Risks), DEFAULT_MAX_RESULTS);
        assert_eq!(
            config.strategies.strategy_name(DatasetType::Risks),
            "keyword"
        );
    }

    #[test]
    fn test_axis_override() {
        let config = PipelineConfig::default().with_axis(DatasetType::Errors, "stage");
        assert_eq!(config.axis_for(DatasetType::Errors, "project"), "stage");
        assert_eq!(config.axis_for(DatasetType::Risks, "project_name"), "project_name");
    }

    #[test]
    fn test_max_results_override() {
        let config = PipelineConfig::default().with_max_results(DatasetType::Contractors, 3);
        assert_eq!(config.max_results_for(DatasetType::Contractors), 3);
        assert_eq!(config.max_results_for(DatasetType::Processes), 20);
    }
}
