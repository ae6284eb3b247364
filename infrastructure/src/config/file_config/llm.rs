//! LLM endpoint configuration from TOML (`[llm]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Base URL up to (not including) `/chat/completions`
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Direct API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Per-call timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Ask the server for strict JSON Schema adherence
    pub strict_schemas: bool,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.1".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: Some(120),
            strict_schemas: false,
        }
    }
}

impl FileLlmConfig {
    /// The configured key, else the value of `api_key_env`, if set.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}
