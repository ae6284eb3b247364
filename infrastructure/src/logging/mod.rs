//! Logging infrastructure: structured pipeline event logging.
//!
//! Provides [`JsonlPipelineLogger`], a JSONL file writer that implements
//! the [`PipelineEventLogger`](tabula_application::PipelineEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlPipelineLogger;
