//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Append pipeline events to this JSONL file
    pub jsonl: Option<PathBuf>,
    /// Include full prompts in the event log
    pub log_prompts: bool,
}
