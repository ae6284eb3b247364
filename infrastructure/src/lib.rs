//! Infrastructure layer for tabula
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod datasets;
pub mod keyphrase;
pub mod llm;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileKeyphraseExtractor, FileOutputConfig,
    FileOutputFormat,
};
pub use datasets::{InMemoryDatasetSource, JsonFileDatasetSource};
pub use keyphrase::{LlmKeyphraseExtractor, StatisticalKeyphraseExtractor};
pub use llm::OpenAiCompatibleGateway;
pub use logging::JsonlPipelineLogger;
pub use tools::{JsonSchemaToolConverter, KeywordSearchTool, default_registry};
