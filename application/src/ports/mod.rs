//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod dataset_source;
pub mod event_logger;
pub mod keyphrase;
pub mod llm_gateway;
pub mod progress;
pub mod tool_schema;
