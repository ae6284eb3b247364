//! Application use cases
//!
//! - [`run_pipeline`]: the eight-stage question answering pipeline
//! - [`classify`], [`execute_tool`], [`compose_answer`]: the stages that call out
//! - [`describe_datasets`]: dataset overview for the CLI

pub mod classify;
pub mod compose_answer;
pub mod describe_datasets;
pub mod execute_tool;
pub mod run_pipeline;
pub(crate) mod shared;
