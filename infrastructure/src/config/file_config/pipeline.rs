//! Pipeline behavior from TOML (`[pipeline]` section)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Classification column override, keyed by dataset type
    pub axes: HashMap<String, String>,
    /// Sampling temperature for the answer
    pub answer_temperature: f32,
    /// Extra classification attempts after a malformed response
    pub classification_retries: u32,
    /// Upper bound on loading one dataset, in seconds
    pub load_timeout_seconds: Option<u64>,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            axes: HashMap::new(),
            answer_temperature: 0.2,
            classification_retries: 1,
            load_timeout_seconds: Some(30),
        }
    }
}
