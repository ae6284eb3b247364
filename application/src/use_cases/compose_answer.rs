//! Answer composition use case.
//!
//! Turns the final records into prose. The model gets the projected records
//! and a short context line; if it fails, times out or answers with nothing,
//! the profile's deterministic fallback text is used instead. Composition
//! itself never fails.

use crate::ports::event_logger::{NoEventLogger, PipelineEvent, PipelineEventLogger};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use crate::use_cases::shared::guarded;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tabula_domain::util::preview;
use tabula_domain::{
    Answer, AnswerMetadata, Compose, ComposePhase, DatasetProfile, DomainRecord, ExtraParams,
    Provenance,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Writes the final answer for one request.
pub struct AnswerComposer {
    gateway: Arc<dyn LlmGateway>,
    temperature: f32,
    timeout: Option<Duration>,
    log_prompts: bool,
    event_logger: Arc<dyn PipelineEventLogger>,
}

impl AnswerComposer {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            temperature: 0.2,
            timeout: None,
            log_prompts: false,
            event_logger: Arc::new(NoEventLogger),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
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

    /// Compose the answer. `records` is carried into the answer untruncated.
    ///
    /// The provenance in `metadata` is overwritten with where the text came
    /// from.
    #[allow(clippy::too_many_arguments)]
    pub async fn compose(
        &self,
        profile: &dyn DatasetProfile,
        question: &str,
        records: Vec<DomainRecord>,
        additional_context: &str,
        params: &ExtraParams,
        mut metadata: AnswerMetadata,
        token: &CancellationToken,
    ) -> Answer {
        let mut phase = ComposePhase::Started;

        advance(&mut phase, ComposePhase::Converting);
        let mut items = Vec::with_capacity(records.len());
        for record in &records {
            match profile.project(record) {
                Ok(fields) => items.push(fields),
                Err(e) => warn!(
                    "Leaving record '{}' out of the answer prompt: {}",
                    preview(record.title(), 60),
                    e
                ),
            }
        }

        advance(&mut phase, ComposePhase::Prompting);
        let prompts = profile.prompts(question, &items, additional_context, params);
        let request =
            CompletionRequest::new(prompts.system, prompts.user).with_temperature(self.temperature);
        debug!(
            "Answer prompt for {} items: {}",
            items.len(),
            preview(&request.user, 300)
        );
        if self.log_prompts {
            self.event_logger.log(PipelineEvent::new(
                "llm_prompt",
                json!({
                    "purpose": "answer",
                    "system": request.system,
                    "user": request.user,
                }),
            ));
        }

        let text = match guarded(self.gateway.complete(&request), self.timeout, token).await {
            Ok(text) if !text.trim().is_empty() => {
                advance(&mut phase, ComposePhase::Succeeded);
                text
            }
            Ok(_) => {
                warn!("Model returned an empty answer, using fallback text");
                advance(&mut phase, ComposePhase::FallbackUsed);
                profile.fallback_text(question, records.len(), params)
            }
            Err(e) => {
                warn!("Answer generation failed, using fallback text: {}", e);
                advance(&mut phase, ComposePhase::FallbackUsed);
                profile.fallback_text(question, records.len(), params)
            }
        };

        let provenance = phase.provenance().unwrap_or(Provenance::Fallback);
        advance(&mut phase, ComposePhase::Done);
        metadata.provenance = provenance;

        info!(
            "Composed {} answer over {} records",
            provenance,
            records.len()
        );
        self.event_logger.log(PipelineEvent::new(
            "answer_composed",
            json!({
                "provenance": provenance,
                "total_found": records.len(),
                "text_preview": preview(&text, 200),
            }),
        ));

        Answer {
            text,
            original_question: question.to_string(),
            total_found: records.len(),
            records,
            metadata,
        }
    }
}

fn advance(phase: &mut ComposePhase, next: ComposePhase) {
    debug_assert!(
        phase.can_transition_to(next),
        "illegal compose transition {phase} -> {next}"
    );
    debug!("Compose phase: {} -> {}", phase, next);
    *phase = next;
}
