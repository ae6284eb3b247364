//! Application layer for tabula
//!
//! This crate contains the pipeline use cases, port definitions, and
//! pipeline configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_MAX_RESULTS, PipelineConfig};
pub use ports::{
    dataset_source::{DatasetSource, SourceError},
    event_logger::{NoEventLogger, PipelineEvent, PipelineEventLogger},
    keyphrase::{KeyphraseError, KeyphraseExtractor},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, PipelineProgress},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::classify::ConstrainedClassifier;
pub use use_cases::compose_answer::AnswerComposer;
pub use use_cases::describe_datasets::{DatasetSummary, DescribeDatasetsUseCase};
pub use use_cases::execute_tool::{ToolExecutionError, ToolExecutor};
pub use use_cases::run_pipeline::{PipelineError, RunPipelineUseCase, StageFailure};
