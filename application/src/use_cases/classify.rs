//! Constrained classification use case.
//!
//! Routes a question to one member of a [`CandidateSet`]. The model sees the
//! candidates as a closed list and must answer in a schema whose `value` field
//! is an enum of exactly those candidates; the response is re-checked with
//! [`CandidateConstraint::validate`] before it is trusted.
//!
//! Classification never fails the pipeline: any error yields the empty
//! string, which downstream filtering treats as "keep every row".

use crate::ports::event_logger::{NoEventLogger, PipelineEvent, PipelineEventLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::use_cases::shared::guarded;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tabula_domain::util::{preview, preview_list};
use tabula_domain::{CandidateConstraint, CandidateSet, ClassificationResult, PromptTemplate};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Schema name sent with the structured request.
const SCHEMA_NAME: &str = "classification";

/// Picks the best-matching candidate for a question.
pub struct ConstrainedClassifier {
    gateway: Arc<dyn LlmGateway>,
    timeout: Option<Duration>,
    retries: u32,
    log_prompts: bool,
    event_logger: Arc<dyn PipelineEventLogger>,
}

impl ConstrainedClassifier {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            timeout: None,
            retries: 1,
            log_prompts: false,
            event_logger: Arc::new(NoEventLogger),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra attempts after a response that violates the constraint.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_log_prompts(mut self, enabled: bool) -> Self {
        self.log_prompts = enabled;
        self
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn PipelineEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    /// Best candidate for `question`, or `""` when none could be chosen.
    ///
    /// The returned value is always a member of `candidates` or empty.
    pub async fn classify(
        &self,
        question: &str,
        candidates: &CandidateSet,
        item_label: &str,
        token: &CancellationToken,
    ) -> String {
        match self
            .classify_detailed(question, candidates, item_label, token)
            .await
        {
            Ok(result) => result.best_value().unwrap_or_default().to_string(),
            Err(e) => {
                warn!("Classification failed, continuing unclassified: {}", e);
                String::new()
            }
        }
    }

    /// Full ranked result. An empty candidate set returns an empty result
    /// without calling the model.
    pub async fn classify_detailed(
        &self,
        question: &str,
        candidates: &CandidateSet,
        item_label: &str,
        token: &CancellationToken,
    ) -> Result<ClassificationResult, GatewayError> {
        if candidates.is_empty() {
            debug!("No candidates to classify against, skipping model call");
            return Ok(ClassificationResult::default());
        }

        let constraint = CandidateConstraint::new(candidates);
        let prompts =
            PromptTemplate::classification(question, item_label, constraint.delimited_values());
        let request = CompletionRequest::new(prompts.system, prompts.user).with_temperature(0.0);
        let schema = constraint.schema();

        debug!(
            "Classifying against {} {} candidates: {}",
            candidates.len(),
            item_label,
            preview_list(candidates.values(), 5)
        );
        if self.log_prompts {
            self.event_logger.log(PipelineEvent::new(
                "llm_prompt",
                json!({
                    "purpose": "classification",
                    "system": request.system,
                    "user": request.user,
                }),
            ));
        }

        let attempts = self.retries + 1;
        let mut last_error = GatewayError::ShapeViolation("no attempt made".to_string());
        for attempt in 1..=attempts {
            let call = self
                .gateway
                .complete_structured(&request, SCHEMA_NAME, &schema);
            let outcome = match guarded(call, self.timeout, token).await {
                Ok(value) => constraint
                    .validate(&value)
                    .map_err(|violation| GatewayError::ShapeViolation(violation.to_string())),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(result) => {
                    let best = result.best_value().unwrap_or_default();
                    info!(
                        "Classified question as '{}' ({} matches)",
                        best,
                        result.matches.len()
                    );
                    debug!("Classifier reasoning: {}", preview(&result.reasoning, 200));
                    self.event_logger.log(PipelineEvent::new(
                        "classification",
                        json!({
                            "candidates": candidates.len(),
                            "best_value": best,
                            "matches": result.matches,
                            "reasoning": result.reasoning,
                            "attempts": attempt,
                        }),
                    ));
                    return Ok(result);
                }
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(
                        "Classification attempt {}/{} rejected: {}",
                        attempt, attempts, e
                    );
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}
