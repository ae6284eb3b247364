//! Model-backed keyphrase extraction.

use super::statistical::StatisticalKeyphraseExtractor;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tabula_application::{
    CompletionRequest, GatewayError, KeyphraseError, KeyphraseExtractor, LlmGateway,
};
use tabula_domain::PromptTemplate;
use tracing::{debug, warn};

const SCHEMA_NAME: &str = "keyphrases";

fn schema(max: usize) -> Value {
    json!({
        "type": "object",
        "properties": {
            "keywords": {
                "type": "array",
                "maxItems": max,
                "items": { "type": "string" }
            }
        },
        "required": ["keywords"],
        "additionalProperties": false
    })
}

fn parse(response: &Value, max: usize) -> Result<Vec<String>, GatewayError> {
    let keywords = response
        .get("keywords")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::ShapeViolation("missing 'keywords' array".to_string()))?;

    let mut phrases: Vec<String> = Vec::new();
    for keyword in keywords {
        let Some(text) = keyword.as_str().map(str::trim) else {
            continue;
        };
        if !text.is_empty() && !phrases.iter().any(|p| p.eq_ignore_ascii_case(text)) {
            phrases.push(text.to_string());
        }
    }
    phrases.truncate(max);
    Ok(phrases)
}

/// Asks the model for keyphrases at temperature 0.
///
/// Any gateway failure, or an empty answer for a non-blank question, falls
/// back to [`StatisticalKeyphraseExtractor`].
pub struct LlmKeyphraseExtractor {
    gateway: Arc<dyn LlmGateway>,
    fallback: StatisticalKeyphraseExtractor,
}

impl LlmKeyphraseExtractor {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            fallback: StatisticalKeyphraseExtractor::new(),
        }
    }
}

#[async_trait]
impl KeyphraseExtractor for LlmKeyphraseExtractor {
    async fn extract(&self, text: &str, max: usize) -> Result<Vec<String>, KeyphraseError> {
        if text.trim().is_empty() || max == 0 {
            return Ok(Vec::new());
        }

        let prompts = PromptTemplate::keyphrases(text, max);
        let request = CompletionRequest::new(prompts.system, prompts.user);

        let result = self
            .gateway
            .complete_structured(&request, SCHEMA_NAME, &schema(max))
            .await
            .and_then(|response| parse(&response, max));

        match result {
            Ok(phrases) if !phrases.is_empty() => {
                debug!("Model keyphrases: {:?}", phrases);
                Ok(phrases)
            }
            Ok(_) => {
                warn!("Model returned no keyphrases, using statistical extraction");
                Ok(self.fallback.keyphrases(text, max))
            }
            Err(GatewayError::Cancelled) => Err(KeyphraseError::Failed("cancelled".to_string())),
            Err(e) => {
                warn!("Keyphrase model call failed ({}), using statistical extraction", e);
                Ok(self.fallback.keyphrases(text, max))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockGateway {
        responses: Mutex<VecDeque<Result<Value, GatewayError>>>,
        calls: Mutex<Vec<CompletionRequest>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Result<Value, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
            Err(GatewayError::RequestFailed("not scripted".to_string()))
        }

        async fn complete_structured(
            &self,
            request: &CompletionRequest,
            schema_name: &str,
            _schema: &Value,
        ) -> Result<Value, GatewayError> {
            assert_eq!(schema_name, SCHEMA_NAME);
            self.calls.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::RequestFailed("exhausted".to_string())))
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_uses_model_keywords() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(json!({
            "keywords": ["supplier delay", " tooling ", "", "Tooling", "budget"]
        }))]));
        let extractor = LlmKeyphraseExtractor::new(gateway.clone());

        let phrases = extractor.extract("risks of supplier delay", 3).await.unwrap();

        assert_eq!(phrases, vec!["supplier delay", "tooling", "budget"]);
        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, 0.0);
    }

    #[tokio::test]
    async fn test_falls_back_on_failure() {
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::Timeout)]));
        let extractor = LlmKeyphraseExtractor::new(gateway);

        let phrases = extractor.extract("supplier delay risks", 5).await.unwrap();
        assert_eq!(phrases, vec!["supplier", "delay", "risks"]);
    }

    #[tokio::test]
    async fn test_falls_back_on_bad_shape() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(json!({"words": ["x"]}))]));
        let extractor = LlmKeyphraseExtractor::new(gateway);

        let phrases = extractor.extract("tooling delay", 5).await.unwrap();
        assert_eq!(phrases, vec!["tooling", "delay"]);
    }

    #[tokio::test]
    async fn test_cancelled_is_an_error() {
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::Cancelled)]));
        let extractor = LlmKeyphraseExtractor::new(gateway);
        assert!(extractor.extract("tooling delay", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_blank_question_makes_no_call() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let extractor = LlmKeyphraseExtractor::new(gateway.clone());

        assert!(extractor.extract("   ", 5).await.unwrap().is_empty());
        assert!(gateway.calls.lock().unwrap().is_empty());
    }
}
