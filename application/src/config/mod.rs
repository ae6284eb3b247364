//! Application-level configuration.
//!
//! - [`PipelineConfig`]: timeouts, retries, strategy bindings and result limits

pub mod pipeline_config;

pub use pipeline_config::{DEFAULT_MAX_RESULTS, PipelineConfig};
