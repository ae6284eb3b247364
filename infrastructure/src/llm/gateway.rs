//! OpenAI-compatible LLM Gateway implementation

use super::protocol::{ChatRequest, ChatResponse, parse_json_content};
use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};
use tabula_application::{CompletionRequest, GatewayError, LlmGateway};
use tracing::{debug, info, warn};

/// LLM Gateway over the chat completions HTTP API.
///
/// One instance is shared by every request; `reqwest::Client` pools
/// connections internally.
pub struct OpenAiCompatibleGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    strict_schemas: bool,
}

impl OpenAiCompatibleGateway {
    /// Create a gateway with an HTTP-level timeout.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        info!("OpenAiCompatibleGateway initialized ({} @ {})", model, base_url);

        Ok(Self {
            http,
            base_url,
            api_key: None,
            model,
            strict_schemas: false,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Whether structured calls ask the server for strict schema adherence.
    pub fn with_strict_schemas(mut self, strict: bool) -> Self {
        self.strict_schemas = strict;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let start = Instant::now();

        let mut http_request = self.http.post(self.endpoint()).json(request);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            warn!(error = %e, "LLM request failed");
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ConnectionError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "LLM API error");
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let content = body
            .first_content()
            .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".to_string()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "LLM chat completion"
        );
        Ok(content)
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let chat = ChatRequest::new(
            &self.model,
            &request.system,
            &request.user,
            request.temperature,
        );
        self.send(&chat).await
    }

    async fn complete_structured(
        &self,
        request: &CompletionRequest,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, GatewayError> {
        let chat = ChatRequest::new(
            &self.model,
            &request.system,
            &request.user,
            request.temperature,
        )
        .with_schema(schema_name, schema, self.strict_schemas);

        let content = self.send(&chat).await?;
        parse_json_content(&content).map_err(|e| {
            debug!("Unparseable structured output: {}", content);
            GatewayError::ShapeViolation(format!("{schema_name}: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gateway =
            OpenAiCompatibleGateway::new("http://localhost:11434/v1/", "llama3", None).unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(gateway.model(), "llama3");
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let gateway = OpenAiCompatibleGateway::new("http://x", "m", None)
            .unwrap()
            .with_api_key(Some("  ".to_string()));
        assert!(gateway.api_key.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let gateway = OpenAiCompatibleGateway::new(
            "http://127.0.0.1:9",
            "m",
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let result = gateway.complete(&CompletionRequest::new("s", "u")).await;
        assert!(matches!(
            result,
            Err(GatewayError::ConnectionError(_)) | Err(GatewayError::Timeout)
        ));
    }
}
