//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly, validated, and then converted into the
//! application's immutable [`PipelineConfig`].

mod datasets;
mod llm;
mod logging;
mod output;
mod pipeline;
mod strategies;

pub use datasets::{FileDatasetConfig, FileDatasetsConfig};
pub use llm::FileLlmConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use pipeline::FilePipelineConfig;
pub use strategies::{FileKeyphraseExtractor, FileStrategiesConfig};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tabula_application::PipelineConfig;
use tabula_domain::{DatasetType, StrategyBindings};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("unknown dataset type '{key}' in [{section}]")]
    UnknownDatasetType { section: &'static str, key: String },

    #[error("llm.model cannot be empty")]
    EmptyModelName,

    #[error("pipeline.answer_temperature must be between 0 and 2, got {0}")]
    InvalidTemperature(f32),

    #[error("{0} must be at least 1")]
    Zero(&'static str),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model endpoint
    pub llm: FileLlmConfig,
    /// Dataset files and limits
    pub datasets: FileDatasetsConfig,
    /// Pipeline behavior
    pub pipeline: FilePipelineConfig,
    /// Filter strategy bindings
    pub strategies: FileStrategiesConfig,
    /// Event log
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

fn dataset_key(section: &'static str, key: &str) -> Result<DatasetType, ConfigValidationError> {
    key.parse().map_err(|_| ConfigValidationError::UnknownDatasetType {
        section,
        key: key.to_string(),
    })
}

fn seconds(value: Option<u64>) -> Option<Duration> {
    value.map(Duration::from_secs)
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.llm.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout("llm.timeout_seconds"));
        }
        if let Some(0) = self.pipeline.load_timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout(
                "pipeline.load_timeout_seconds",
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        let temperature = self.pipeline.answer_temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigValidationError::InvalidTemperature(temperature));
        }

        if self.strategies.top_n == 0 {
            return Err(ConfigValidationError::Zero("strategies.top_n"));
        }
        if self.strategies.keyphrase_count == 0 {
            return Err(ConfigValidationError::Zero("strategies.keyphrase_count"));
        }
        for dataset in DatasetType::ALL {
            if let Some(0) = self.datasets.entry(dataset).max_results {
                return Err(ConfigValidationError::Zero("datasets.<type>.max_results"));
            }
        }

        for key in self.pipeline.axes.keys() {
            dataset_key("pipeline.axes", key)?;
        }
        for key in self.strategies.bindings.keys() {
            dataset_key("strategies.bindings", key)?;
        }

        Ok(())
    }

    /// Validate and build the pipeline configuration.
    pub fn to_pipeline_config(&self) -> Result<PipelineConfig, ConfigValidationError> {
        self.validate()?;

        let mut strategies = StrategyBindings::new();
        for (dataset, strategy) in &self.strategies.bindings {
            strategies = strategies.bind_dataset(dataset_key("strategies.bindings", dataset)?, strategy);
        }
        for (strategy, tool) in &self.strategies.tools {
            strategies = strategies.bind_tool(strategy, tool);
        }
        for (strategy, source) in &self.strategies.args {
            strategies = strategies.with_argument_source(strategy, *source);
        }

        let mut config = PipelineConfig::default()
            .with_strategies(strategies)
            .with_answer_temperature(self.pipeline.answer_temperature)
            .with_classification_retries(self.pipeline.classification_retries)
            .with_default_top_n(self.strategies.top_n)
            .with_keyphrase_count(self.strategies.keyphrase_count)
            .with_llm_timeout(seconds(self.llm.timeout_seconds))
            .with_load_timeout(seconds(self.pipeline.load_timeout_seconds))
            .with_log_prompts(self.logging.log_prompts);

        for (dataset, column) in &self.pipeline.axes {
            config = config.with_axis(dataset_key("pipeline.axes", dataset)?, column);
        }
        for dataset in DatasetType::ALL {
            if let Some(max) = self.datasets.entry(dataset).max_results {
                config = config.with_max_results(dataset, max);
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };
    use tabula_domain::{ArgumentSource, FilterStrategy};

    /// Merge like the loader does, so map sections keep their defaults.
    fn layered(toml_str: &str) -> FileConfig {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::string(toml_str))
            .extract()
            .unwrap()
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[llm]
model = "qwen2.5"
timeout_seconds = 60

[datasets]
dir = "/data"

[datasets.contractors]
max_results = 3

[pipeline]
answer_temperature = 0.5
classification_retries = 2

[pipeline.axes]
contractors = "projects"

[strategies]
top_n = 8

[strategies.bindings]
errors = "keyword"

[strategies.args]
keyword = "model"

[logging]
jsonl = "/tmp/tabula.jsonl"
log_prompts = true

[output]
color = false
"#;

        let config = layered(toml_str);
        let pipeline = config.to_pipeline_config().unwrap();

        assert_eq!(pipeline.answer_temperature, 0.5);
        assert_eq!(pipeline.classification_retries, 2);
        assert_eq!(pipeline.default_top_n, 8);
        assert_eq!(pipeline.llm_timeout, Some(Duration::from_secs(60)));
        assert!(pipeline.log_prompts);
        assert_eq!(pipeline.axis_for(DatasetType::Contractors, "work_types"), "projects");
        assert_eq!(pipeline.axis_for(DatasetType::Risks, "project_name"), "project_name");
        assert_eq!(pipeline.max_results_for(DatasetType::Contractors), 3);
        assert_eq!(pipeline.max_results_for(DatasetType::Risks), 20);

        // defaults survive alongside the new binding
        assert_eq!(
            pipeline.strategies.resolve(DatasetType::Risks).unwrap(),
            FilterStrategy::ToolBound {
                strategy: "keyword".to_string(),
                tool: "search_by_keywords".to_string(),
            }
        );
        assert_eq!(
            pipeline.strategies.resolve(DatasetType::Errors).unwrap().tool(),
            Some("search_by_keywords")
        );
        assert_eq!(
            pipeline.strategies.argument_source("keyword"),
            ArgumentSource::Model
        );
        assert!(!config.output.color);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());

        let pipeline = config.to_pipeline_config().unwrap();
        assert_eq!(pipeline.strategies, StrategyBindings::defaults());
        assert_eq!(pipeline.answer_temperature, 0.2);
        assert_eq!(pipeline.keyphrase_count, 7);
        assert!(pipeline.axis_overrides.is_empty());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let toml_str = r#"
[llm]
timeout_seconds = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout("llm.timeout_seconds"))
        );
    }

    #[test]
    fn test_validate_empty_model_name() {
        let toml_str = r#"
[llm]
model = "  "
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));
    }

    #[test]
    fn test_validate_unknown_dataset_type() {
        let toml_str = r#"
[strategies.bindings]
suppliers = "keyword"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownDatasetType { .. })
        ));
    }

    #[test]
    fn test_validate_temperature_and_top_n() {
        let mut config = FileConfig::default();
        config.pipeline.answer_temperature = 3.0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTemperature(3.0))
        );

        let mut config = FileConfig::default();
        config.strategies.top_n = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::Zero("strategies.top_n"))
        );
    }

    #[test]
    fn test_unbinding_with_none() {
        let toml_str = r#"
[strategies.bindings]
risks = "none"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let pipeline = config.to_pipeline_config().unwrap();
        assert_eq!(
            pipeline.strategies.resolve(DatasetType::Risks).unwrap(),
            FilterStrategy::Direct
        );
    }
}
