//! LLM Gateway port
//!
//! Defines the interface for communicating with an LLM provider.
//!
//! The pipeline makes single-shot calls only: a free-text completion for the
//! answer and structured completions for classification, keyphrases and tool
//! arguments. No session state is kept between calls.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The structured response did not parse or did not match its schema.
    #[error("Response shape violation: {0}")]
    ShapeViolation(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Whether another attempt with the same prompt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::ShapeViolation(_))
    }
}

/// One model call: system and user prompts plus sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Free-text completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;

    /// Completion whose output must be a JSON value matching `schema`.
    ///
    /// Adapters should pass the schema to the provider as a response format
    /// where supported. Callers validate the returned value themselves.
    async fn complete_structured(
        &self,
        request: &CompletionRequest,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, GatewayError>;
}
