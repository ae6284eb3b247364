//! Run Pipeline use case.
//!
//! The single entry point of the system: answers one question about one
//! dataset type by running the fixed stage sequence
//!
//! ```text
//! Load → Normalize → PreFilter → ExtractCandidates → Classify → Filter → MapRecords → Compose
//! ```
//!
//! [`RunPipelineUseCase::process`] always returns an [`Answer`]. Stages that
//! can degrade (classification, tools, composition) do so internally; the
//! stages that cannot (loading, an unsupported dataset type, cancellation)
//! end the run with an explanatory answer and no records.

use crate::config::PipelineConfig;
use crate::ports::dataset_source::{DatasetSource, SourceError};
use crate::ports::event_logger::{NoEventLogger, PipelineEvent, PipelineEventLogger};
use crate::ports::keyphrase::KeyphraseExtractor;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, PipelineProgress};
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::classify::ConstrainedClassifier;
use crate::use_cases::compose_answer::AnswerComposer;
use crate::use_cases::execute_tool::ToolExecutor;
use crate::use_cases::shared::{Interruption, check_cancelled, guarded};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tabula_domain::util::preview;
use tabula_domain::{
    Answer, AnswerMetadata, Compose, Dataset, DatasetProfile, DatasetType, DomainError,
    DomainRecord, ExtraParams, ExtractAxis, NONE_STRATEGY, Normalize, ProfileRegistry, Provenance,
    Question, RelevanceMap, Stage, ToolRegistry, filter_by_value, sort_by_relevance,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Failures that end a run before an answer can be composed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(DomainError),

    #[error("Unsupported dataset: {0}")]
    UnsupportedDataset(DomainError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Timed out")]
    Timeout,

    #[error("Cancelled")]
    Cancelled,
}

impl From<Interruption> for PipelineError {
    fn from(interruption: Interruption) -> Self {
        match interruption {
            Interruption::Timeout => PipelineError::Timeout,
            Interruption::Cancelled => PipelineError::Cancelled,
        }
    }
}

impl PipelineError {
    /// Explanatory answer text shown to the user in place of results.
    pub fn user_message(&self, question: &str, dataset: DatasetType) -> String {
        match self {
            PipelineError::InvalidQuestion(_) => {
                format!("Please ask a question about {dataset}.")
            }
            PipelineError::UnsupportedDataset(_) => {
                format!("Questions about {dataset} are not supported.")
            }
            PipelineError::Source(_) | PipelineError::Timeout => format!(
                "The {dataset} data is currently unavailable, so your request '{question}' could not be answered."
            ),
            PipelineError::Cancelled => format!("Your request '{question}' was cancelled."),
        }
    }
}

/// A [`PipelineError`] tagged with the stage it ended.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("stage {stage} failed: {error}")]
pub struct StageFailure {
    pub stage: Stage,
    pub error: PipelineError,
}

impl StageFailure {
    fn at(stage: Stage) -> impl FnOnce(PipelineError) -> StageFailure {
        move |error| StageFailure { stage, error }
    }
}

/// Per-request state threaded through the stages.
struct RunContext<'a> {
    request_id: u64,
    dataset: DatasetType,
    progress: &'a dyn PipelineProgress,
    token: CancellationToken,
}

/// Use case answering one question about one dataset type.
///
/// Shared between concurrent requests behind an `Arc`; every call to
/// [`process`](Self::process) gets its own request id and a child of the
/// shutdown token.
pub struct RunPipelineUseCase {
    source: Arc<dyn DatasetSource>,
    profiles: ProfileRegistry,
    classifier: ConstrainedClassifier,
    executor: ToolExecutor,
    composer: AnswerComposer,
    config: Arc<PipelineConfig>,
    event_logger: Arc<dyn PipelineEventLogger>,
    next_request_id: AtomicU64,
    shutdown: CancellationToken,
}

impl RunPipelineUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        source: Arc<dyn DatasetSource>,
        keyphrases: Arc<dyn KeyphraseExtractor>,
        tools: Arc<ToolRegistry>,
        tool_schema: Arc<dyn ToolSchemaPort>,
        config: PipelineConfig,
    ) -> Self {
        let config = Arc::new(config);
        let classifier = ConstrainedClassifier::new(gateway.clone())
            .with_timeout(config.llm_timeout)
            .with_retries(config.classification_retries)
            .with_log_prompts(config.log_prompts);
        let executor = ToolExecutor::new(
            tools,
            keyphrases,
            gateway.clone(),
            tool_schema,
            config.clone(),
        );
        let composer = AnswerComposer::new(gateway)
            .with_temperature(config.answer_temperature)
            .with_timeout(config.llm_timeout)
            .with_log_prompts(config.log_prompts);

        Self {
            source,
            profiles: ProfileRegistry::builtin(),
            classifier,
            executor,
            composer,
            config,
            event_logger: Arc::new(NoEventLogger),
            next_request_id: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    /// Create with a pipeline event logger, shared by every stage.
    pub fn with_event_logger(mut self, logger: Arc<dyn PipelineEventLogger>) -> Self {
        self.classifier = self.classifier.with_event_logger(logger.clone());
        self.executor = self.executor.with_event_logger(logger.clone());
        self.composer = self.composer.with_event_logger(logger.clone());
        self.event_logger = logger;
        self
    }

    pub fn with_profiles(mut self, profiles: ProfileRegistry) -> Self {
        self.profiles = profiles;
        self
    }

    /// Parent token: cancelling it aborts every in-flight request.
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.executor.registry()
    }

    /// Answer `question` about `dataset`. Never fails.
    pub async fn process(&self, question: &str, dataset: DatasetType, params: ExtraParams) -> Answer {
        self.process_with_progress(question, dataset, params, &NoProgress)
            .await
    }

    /// [`process`](Self::process) with stage progress callbacks.
    pub async fn process_with_progress(
        &self,
        question: &str,
        dataset: DatasetType,
        params: ExtraParams,
        progress: &dyn PipelineProgress,
    ) -> Answer {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed) + 1;
        let ctx = RunContext {
            request_id,
            dataset,
            progress,
            token: self.shutdown.child_token(),
        };
        let span = info_span!("pipeline", request_id, dataset = %dataset);

        async {
            info!("Processing question: {}", preview(question, 100));
            self.event_logger.log(PipelineEvent::new(
                "pipeline_started",
                json!({
                    "request_id": request_id,
                    "dataset": dataset,
                    "question": question,
                    "params": params,
                }),
            ));

            let mut answer = match self.run_stages(question, &params, &ctx).await {
                Ok(answer) => answer,
                Err(failure) => {
                    match failure.error {
                        PipelineError::Cancelled => warn!("{}", failure),
                        _ => error!("{}", failure),
                    }
                    progress.on_stage_failed(failure.stage, &failure.error.to_string());
                    let metadata = AnswerMetadata::new(dataset, Provenance::PipelineError)
                        .with_request_id(request_id);
                    Answer::empty(
                        failure.error.user_message(question.trim(), dataset),
                        question,
                        metadata,
                    )
                }
            };

            let limit = params
                .limit
                .unwrap_or_else(|| self.config.max_results_for(dataset));
            if answer.records.len() > limit {
                debug!(
                    "Returning {} of {} records",
                    limit,
                    answer.records.len()
                );
                answer.truncate_records(limit);
            }

            info!(
                "Answered with {} records found ({})",
                answer.total_found, answer.metadata.provenance
            );
            progress.on_finished();
            answer
        }
        .instrument(span)
        .await
    }

    async fn run_stages(
        &self,
        question: &str,
        params: &ExtraParams,
        ctx: &RunContext<'_>,
    ) -> Result<Answer, StageFailure> {
        let question = Question::try_new(question)
            .map_err(PipelineError::InvalidQuestion)
            .map_err(StageFailure::at(Stage::Load))?;
        let question = question.content();
        let profile = self
            .profiles
            .get(ctx.dataset)
            .map_err(PipelineError::UnsupportedDataset)
            .map_err(StageFailure::at(Stage::Load))?;

        // Stage 1: load
        ctx.progress.on_stage_start(Stage::Load);
        let load = async {
            self.source
                .load(ctx.dataset)
                .await
                .map_err(PipelineError::from)
        };
        let raw = guarded(load, self.config.load_timeout, &ctx.token)
            .instrument(stage_span(Stage::Load))
            .await
            .map_err(StageFailure::at(Stage::Load))?;
        self.complete(ctx, Stage::Load, format!("{} rows", raw.len()));

        // Stage 2: normalize
        ctx.progress.on_stage_start(Stage::Normalize);
        let normalized = stage_span(Stage::Normalize).in_scope(|| profile.normalize(raw));
        self.complete(
            ctx,
            Stage::Normalize,
            format!(
                "{} rows, {} columns",
                normalized.len(),
                normalized.columns().len()
            ),
        );

        // Stage 3: pre-filter
        ctx.progress.on_stage_start(Stage::PreFilter);
        let before = normalized.len();
        let filtered = stage_span(Stage::PreFilter).in_scope(|| {
            if ctx.dataset == DatasetType::Risks && params.risk_category.is_none() {
                warn!("No risk category given, using risks of every project type");
            }
            profile.pre_filter(normalized, params)
        });
        self.complete(
            ctx,
            Stage::PreFilter,
            format!("{} of {} rows", filtered.len(), before),
        );

        // Stage 4: extract candidates
        ctx.progress.on_stage_start(Stage::ExtractCandidates);
        let axis = self.config.axis_for(ctx.dataset, profile.axis_column());
        let candidates = stage_span(Stage::ExtractCandidates).in_scope(|| {
            if !filtered.has_column(axis) {
                warn!("Classification column '{}' is missing", axis);
            }
            profile.extract(&filtered, axis)
        });
        self.complete(
            ctx,
            Stage::ExtractCandidates,
            format!("{} candidates in '{}'", candidates.len(), axis),
        );

        if candidates.is_empty() {
            info!("Nothing to classify against, skipping remaining stages");
            let mut metadata = AnswerMetadata::new(ctx.dataset, Provenance::NoItems)
                .with_request_id(ctx.request_id);
            if let Some(category) = profile.category(params) {
                metadata = metadata.with_category(category);
            }
            return Ok(Answer::empty(
                profile.no_items_text(question),
                question,
                metadata,
            ));
        }

        // Stage 5: classify
        ctx.progress.on_stage_start(Stage::Classify);
        let best = self
            .classifier
            .classify(question, &candidates, profile.item_label(), &ctx.token)
            .instrument(stage_span(Stage::Classify))
            .await;
        check_cancelled(&ctx.token).map_err(StageFailure::at(Stage::Classify))?;
        let summary = if best.is_empty() {
            "unclassified".to_string()
        } else {
            format!("'{best}'")
        };
        self.complete(ctx, Stage::Classify, summary);

        // Stage 6: filter
        ctx.progress.on_stage_start(Stage::Filter);
        let strategy_name = self.config.strategies.strategy_name(ctx.dataset);
        let direct = filter_by_value(&filtered, axis, &best);
        let output = if strategy_name == NONE_STRATEGY {
            direct
        } else {
            self.executor
                .apply(question, &direct.dataset, ctx.dataset, params, &ctx.token)
                .instrument(stage_span(Stage::Filter))
                .await
        };
        check_cancelled(&ctx.token).map_err(StageFailure::at(Stage::Filter))?;
        self.complete(
            ctx,
            Stage::Filter,
            format!(
                "{} rows kept by '{}' ({} scored)",
                output.dataset.len(),
                strategy_name,
                output.relevance.len()
            ),
        );

        // Stage 7: map records
        ctx.progress.on_stage_start(Stage::MapRecords);
        let records = stage_span(Stage::MapRecords)
            .in_scope(|| map_records(profile.as_ref(), &output.dataset, &output.relevance));
        self.complete(
            ctx,
            Stage::MapRecords,
            format!("{} records", records.len()),
        );

        // Stage 8: compose
        ctx.progress.on_stage_start(Stage::Compose);
        let context = profile.additional_context(records.len(), &best, params);
        let mut metadata = AnswerMetadata::new(ctx.dataset, Provenance::Generated)
            .with_request_id(ctx.request_id)
            .with_strategy(strategy_name);
        if !best.is_empty() {
            metadata = metadata.with_best_value(best.as_str());
        }
        if let Some(category) = profile.category(params) {
            metadata = metadata.with_category(category);
        }
        let answer = self
            .composer
            .compose(
                profile.as_ref(),
                question,
                records,
                &context,
                params,
                metadata,
                &ctx.token,
            )
            .instrument(stage_span(Stage::Compose))
            .await;
        check_cancelled(&ctx.token).map_err(StageFailure::at(Stage::Compose))?;
        self.complete(
            ctx,
            Stage::Compose,
            answer.metadata.provenance.to_string(),
        );

        Ok(answer)
    }

    fn complete(&self, ctx: &RunContext<'_>, stage: Stage, summary: String) {
        info!(stage = %stage, "Stage {}/{} done: {}", stage.number(), Stage::ALL.len(), summary);
        self.event_logger.log(PipelineEvent::new(
            "stage_completed",
            json!({
                "request_id": ctx.request_id,
                "stage": stage,
                "summary": summary,
            }),
        ));
        ctx.progress.on_stage_complete(stage, &summary);
    }
}

fn stage_span(stage: Stage) -> tracing::Span {
    info_span!("stage", stage = %stage)
}

/// Map retained rows to records, skipping malformed rows, then sort by score.
fn map_records(
    profile: &dyn DatasetProfile,
    dataset: &Dataset,
    relevance: &RelevanceMap,
) -> Vec<DomainRecord> {
    let mut records = Vec::with_capacity(dataset.len());
    for row in dataset.rows() {
        match profile.map_row(row, relevance.get(row.id())) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping malformed row: {}", e),
        }
    }
    sort_by_relevance(&mut records);
    records
}
