//! Tool executor use case.
//!
//! Applies the tool bound to a [`FilterStrategy`] to the rows that survived
//! direct filtering:
//!
//! 1. Look the tool up in the [`ToolRegistry`]
//! 2. Derive its arguments from the question (keyphrases or model-filled)
//! 3. Inject the row limit when the tool takes one
//! 4. Validate and run the tool
//!
//! Every failure degrades to the identity output: the rows pass through
//! unchanged and unscored.

use crate::config::PipelineConfig;
use crate::ports::event_logger::{NoEventLogger, PipelineEvent, PipelineEventLogger};
use crate::ports::keyphrase::KeyphraseExtractor;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::shared::guarded;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tabula_domain::util::preview_list;
use tabula_domain::{
    ArgumentSource, Dataset, DatasetType, DefaultToolValidator, ExtraParams, FilterStrategy, FilterTool,
    PromptTemplate, RowId, ToolArgs, ToolError, ToolOutput, ToolRegistry, ToolValidator,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Parameter name tools use for their row limit.
const TOP_N_PARAM: &str = "top_n";

/// Parameter name keyword-driven tools take their search terms under.
const KEYWORDS_PARAM: &str = "keywords";

/// Reasons a tool application fell back to identity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolExecutionError {
    #[error("Tool '{0}' is not registered")]
    ToolNotFound(String),

    #[error("No keyphrases could be extracted from the question")]
    NoKeyphrases,

    #[error("Keyphrase extraction failed: {0}")]
    Keyphrases(GatewayError),

    #[error("Argument derivation failed: {0}")]
    Arguments(GatewayError),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(ToolError),
}

/// Runs strategy-bound tools over classified rows.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    keyphrases: Arc<dyn KeyphraseExtractor>,
    gateway: Arc<dyn LlmGateway>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    config: Arc<PipelineConfig>,
    validator: DefaultToolValidator,
    event_logger: Arc<dyn PipelineEventLogger>,
}

impl ToolExecutor {
    pub fn new(
        registry: Arc<ToolRegistry>,
        keyphrases: Arc<dyn KeyphraseExtractor>,
        gateway: Arc<dyn LlmGateway>,
        tool_schema: Arc<dyn ToolSchemaPort>,
        config: Arc<PipelineConfig>,
    ) -> Self {
        Self {
            registry,
            keyphrases,
            gateway,
            tool_schema,
            config,
            validator: DefaultToolValidator,
            event_logger: Arc::new(NoEventLogger),
        }
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn PipelineEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Resolve the strategy bound to `dataset_type` and apply it. Never fails.
    ///
    /// An unbound strategy name is a configuration error: it is logged and
    /// the rows pass through unchanged.
    pub async fn apply(
        &self,
        question: &str,
        dataset: &Dataset,
        dataset_type: DatasetType,
        params: &ExtraParams,
        token: &CancellationToken,
    ) -> ToolOutput {
        match self.config.strategies.resolve(dataset_type) {
            Ok(strategy) => {
                self.apply_strategy(&strategy, question, dataset, params, token)
                    .await
            }
            Err(e) => {
                error!("{}; keeping {} rows unfiltered", e, dataset.len());
                ToolOutput::identity(dataset)
            }
        }
    }

    /// Apply an already resolved `strategy` to `dataset`. Never fails.
    ///
    /// [`FilterStrategy::Direct`] and every error path return
    /// [`ToolOutput::identity`].
    pub async fn apply_strategy(
        &self,
        strategy: &FilterStrategy,
        question: &str,
        dataset: &Dataset,
        params: &ExtraParams,
        token: &CancellationToken,
    ) -> ToolOutput {
        let FilterStrategy::ToolBound {
            strategy: strategy_name,
            tool: tool_name,
        } = strategy
        else {
            return ToolOutput::identity(dataset);
        };

        match self
            .try_apply(strategy_name, tool_name, question, dataset, params, token)
            .await
        {
            Ok(output) => output,
            Err(e @ ToolExecutionError::ToolNotFound(_)) => {
                error!("Strategy '{}' is misconfigured: {}", strategy_name, e);
                ToolOutput::identity(dataset)
            }
            Err(e) => {
                warn!(
                    "Tool '{}' skipped, keeping {} rows: {}",
                    tool_name,
                    dataset.len(),
                    e
                );
                ToolOutput::identity(dataset)
            }
        }
    }

    /// Like [`apply_strategy`](Self::apply_strategy) but reports why the tool did not run.
    pub async fn try_apply(
        &self,
        strategy: &str,
        tool_name: &str,
        question: &str,
        dataset: &Dataset,
        params: &ExtraParams,
        token: &CancellationToken,
    ) -> Result<ToolOutput, ToolExecutionError> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| ToolExecutionError::ToolNotFound(tool_name.to_string()))?;

        let mut args = match self.config.strategies.argument_source(strategy) {
            ArgumentSource::Keyphrases => self.keyphrase_args(question, token).await?,
            ArgumentSource::Model => self.model_args(tool.as_ref(), question, token).await?,
        };

        let definition = tool.definition();
        if definition.accepts(TOP_N_PARAM) && !args.contains(TOP_N_PARAM) {
            let top_n = params.top_n.unwrap_or(self.config.default_top_n);
            args.insert(TOP_N_PARAM, top_n);
        }

        self.validator
            .validate(&args, definition)
            .map_err(ToolExecutionError::InvalidArguments)?;

        debug!("Running tool '{}' over {} rows", tool_name, dataset.len());
        let output = keep_input_rows(tool_name, dataset, tool.execute(dataset, &args));

        info!(
            "Tool '{}' kept {} of {} rows ({} scored)",
            tool_name,
            output.dataset.len(),
            dataset.len(),
            output.relevance.len()
        );
        self.event_logger.log(PipelineEvent::new(
            "tool_applied",
            json!({
                "strategy": strategy,
                "tool": tool_name,
                "arguments": args,
                "rows_in": dataset.len(),
                "rows_out": output.dataset.len(),
                "scored": output.relevance.len(),
            }),
        ));

        Ok(output)
    }

    async fn keyphrase_args(
        &self,
        question: &str,
        token: &CancellationToken,
    ) -> Result<ToolArgs, ToolExecutionError> {
        let count = self.config.keyphrase_count;
        let extraction = async {
            self.keyphrases
                .extract(question, count)
                .await
                .map_err(|e| GatewayError::RequestFailed(e.to_string()))
        };
        let keywords = guarded(extraction, self.config.llm_timeout, token)
            .await
            .map_err(ToolExecutionError::Keyphrases)?;

        if keywords.is_empty() {
            return Err(ToolExecutionError::NoKeyphrases);
        }
        debug!("Keyphrases: {}", preview_list(&keywords, count));

        Ok(ToolArgs::new().with_arg(KEYWORDS_PARAM, keywords))
    }

    async fn model_args(
        &self,
        tool: &dyn FilterTool,
        question: &str,
        token: &CancellationToken,
    ) -> Result<ToolArgs, ToolExecutionError> {
        let definition = tool.definition();
        let prompts =
            PromptTemplate::tool_arguments(question, &definition.name, &definition.description);
        let request = CompletionRequest::new(prompts.system, prompts.user).with_temperature(0.0);
        let schema = self.tool_schema.parameters_schema(definition);

        let call = self
            .gateway
            .complete_structured(&request, &definition.name, &schema);
        let value = guarded(call, self.config.llm_timeout, token)
            .await
            .map_err(ToolExecutionError::Arguments)?;

        ToolArgs::from_value(value).map_err(ToolExecutionError::InvalidArguments)
    }
}

/// Drop any output row that was not an input row.
fn keep_input_rows(tool_name: &str, input: &Dataset, mut output: ToolOutput) -> ToolOutput {
    let known: HashSet<RowId> = input.row_ids().into_iter().collect();
    let foreign = output
        .dataset
        .rows()
        .iter()
        .filter(|row| !known.contains(&row.id()))
        .count();
    if foreign > 0 {
        warn!(
            "Tool '{}' returned {} rows that were not in its input; dropping them",
            tool_name, foreign
        );
        output.dataset = output.dataset.filter(|row| known.contains(&row.id()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::keyphrase::KeyphraseError;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;
    use tabula_domain::{
        Cell, RelevanceMap, StrategyBindings, ToolDefinition, ToolParameter,
    };

    // ==================== Test Mocks ====================

    /// Keeps the first `top_n` rows and records the arguments it saw.
    struct RecordingTool {
        definition: ToolDefinition,
        seen: Mutex<Vec<ToolArgs>>,
    }

    impl RecordingTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("search_by_keywords", "Keyword search")
                    .with_parameter(
                        ToolParameter::new("keywords", "Words to find", true).array_of("string"),
                    )
                    .with_parameter(
                        ToolParameter::new("top_n", "Rows to keep", false).with_type("integer"),
                    ),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl FilterTool for RecordingTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        fn execute(&self, dataset: &Dataset, args: &ToolArgs) -> ToolOutput {
            self.seen.lock().unwrap().push(args.clone());
            let kept = dataset.head(args.get_usize("top_n").unwrap_or(1));
            let relevance: RelevanceMap = kept.row_ids().into_iter().map(|id| (id, 0.5)).collect();
            ToolOutput::new(kept, relevance)
        }
    }

    /// Returns rows that were never in its input.
    struct FabricatingTool {
        definition: ToolDefinition,
    }

    impl FilterTool for FabricatingTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        fn execute(&self, dataset: &Dataset, _args: &ToolArgs) -> ToolOutput {
            let mut out = dataset.clone();
            out.push_cells(vec![Cell::from("invented")]);
            ToolOutput::new(out, RelevanceMap::new())
        }
    }

    struct FixedKeyphrases(Vec<String>);

    #[async_trait]
    impl KeyphraseExtractor for FixedKeyphrases {
        async fn extract(&self, _text: &str, max: usize) -> Result<Vec<String>, KeyphraseError> {
            Ok(self.0.iter().take(max).cloned().collect())
        }
    }

    struct MockGateway {
        arguments: Value,
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
            Err(GatewayError::RequestFailed("not expected".to_string()))
        }

        async fn complete_structured(
            &self,
            _request: &CompletionRequest,
            _schema_name: &str,
            _schema: &Value,
        ) -> Result<Value, GatewayError> {
            Ok(self.arguments.clone())
        }
    }

    struct PassThroughSchema;

    impl ToolSchemaPort for PassThroughSchema {
        fn parameters_schema(&self, _tool: &ToolDefinition) -> Value {
            json!({"type": "object"})
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_table(
            &["risk_text"],
            vec![
                vec!["supplier delay".into()],
                vec!["budget overrun".into()],
                vec!["staff turnover".into()],
            ],
        )
    }

    fn executor(
        tool: Arc<dyn FilterTool>,
        keyphrases: Vec<&str>,
        bindings: StrategyBindings,
    ) -> ToolExecutor {
        let registry = ToolRegistry::new().with_tool(tool).unwrap();
        ToolExecutor::new(
            Arc::new(registry),
            Arc::new(FixedKeyphrases(
                keyphrases.into_iter().map(String::from).collect(),
            )),
            Arc::new(MockGateway {
                arguments: json!({"keywords": ["budget"]}),
            }),
            Arc::new(PassThroughSchema),
            Arc::new(PipelineConfig::default().with_strategies(bindings)),
        )
    }

    fn keyword_strategy() -> FilterStrategy {
        FilterStrategy::ToolBound {
            strategy: "keyword".to_string(),
            tool: "search_by_keywords".to_string(),
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_direct_strategy_is_identity() {
        let executor = executor(
            Arc::new(RecordingTool::new()),
            vec!["delay"],
            StrategyBindings::defaults(),
        );
        let ds = dataset();
        let out = executor
            .apply_strategy(
                &FilterStrategy::Direct,
                "q",
                &ds,
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(out.dataset, ds);
        assert!(out.relevance.is_empty());
    }

    #[tokio::test]
    async fn test_keyphrases_and_top_n_reach_the_tool() {
        let tool = Arc::new(RecordingTool::new());
        let executor = executor(
            tool.clone(),
            vec!["delay", "supplier"],
            StrategyBindings::defaults(),
        );
        let params = ExtraParams::new().with_top_n(2);

        let out = executor
            .apply_strategy(
                &keyword_strategy(),
                "supplier delay?",
                &dataset(),
                &params,
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(out.dataset.len(), 2);
        assert_eq!(out.relevance.get(RowId(0)), Some(0.5));
        let seen = tool.seen.lock().unwrap();
        assert_eq!(
            seen[0].get_string_list("keywords").unwrap(),
            vec!["delay".to_string(), "supplier".to_string()]
        );
        assert_eq!(seen[0].get_usize("top_n"), Some(2));
    }

    #[tokio::test]
    async fn test_default_top_n_is_injected() {
        let tool = Arc::new(RecordingTool::new());
        let executor = executor(tool.clone(), vec!["delay"], StrategyBindings::defaults());

        executor
            .apply_strategy(
                &keyword_strategy(),
                "q",
                &dataset(),
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(tool.seen.lock().unwrap()[0].get_usize("top_n"), Some(5));
    }

    #[tokio::test]
    async fn test_no_keyphrases_is_identity() {
        let tool = Arc::new(RecordingTool::new());
        let executor = executor(tool.clone(), vec![], StrategyBindings::defaults());
        let ds = dataset();

        let result = executor
            .try_apply(
                "keyword",
                "search_by_keywords",
                "?",
                &ds,
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(result, Err(ToolExecutionError::NoKeyphrases));

        let out = executor
            .apply_strategy(
                &keyword_strategy(),
                "?",
                &ds,
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(out.dataset.len(), 3);
        assert!(tool.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tool_is_identity() {
        let executor = executor(
            Arc::new(RecordingTool::new()),
            vec!["delay"],
            StrategyBindings::defaults(),
        );
        let strategy = FilterStrategy::ToolBound {
            strategy: "semantic".to_string(),
            tool: "vector_search".to_string(),
        };
        let ds = dataset();

        let out = executor
            .apply_strategy(
                &strategy,
                "q",
                &ds,
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(out.dataset, ds);
        assert!(out.relevance.is_empty());
    }

    #[tokio::test]
    async fn test_model_filled_arguments() {
        let tool = Arc::new(RecordingTool::new());
        let bindings =
            StrategyBindings::defaults().with_argument_source("keyword", ArgumentSource::Model);
        let executor = executor(tool.clone(), vec![], bindings);

        executor
            .apply_strategy(
                &keyword_strategy(),
                "budget risks",
                &dataset(),
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;

        let seen = tool.seen.lock().unwrap();
        assert_eq!(
            seen[0].get_string_list("keywords").unwrap(),
            vec!["budget".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fabricated_rows_are_dropped() {
        let tool = Arc::new(FabricatingTool {
            definition: ToolDefinition::new("search_by_keywords", "fabricates").with_parameter(
                ToolParameter::new("keywords", "Words", true).array_of("string"),
            ),
        });
        let executor = executor(tool, vec!["delay"], StrategyBindings::defaults());
        let ds = dataset();

        let out = executor
            .apply_strategy(
                &keyword_strategy(),
                "q",
                &ds,
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(out.dataset.row_ids(), ds.row_ids());
    }

    #[tokio::test]
    async fn test_dataset_without_binding_is_identity() {
        let tool = Arc::new(RecordingTool::new());
        let executor = executor(tool.clone(), vec!["delay"], StrategyBindings::defaults());
        let ds = dataset();

        let out = executor
            .apply(
                "q",
                &ds,
                DatasetType::Errors,
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(out.dataset, ds);
        assert!(out.relevance.is_empty());
        assert!(tool.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unbound_strategy_is_identity() {
        let tool = Arc::new(RecordingTool::new());
        let bindings = StrategyBindings::new().bind_dataset(DatasetType::Processes, "semantic");
        let executor = executor(tool.clone(), vec!["delay"], bindings);
        let ds = dataset();

        let out = executor
            .apply(
                "q",
                &ds,
                DatasetType::Processes,
                &ExtraParams::new(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(out.dataset, ds);
        assert!(tool.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bound_dataset_runs_its_tool() {
        let tool = Arc::new(RecordingTool::new());
        let executor = executor(tool.clone(), vec!["delay"], StrategyBindings::defaults());

        let out = executor
            .apply(
                "q",
                &dataset(),
                DatasetType::Risks,
                &ExtraParams::new().with_top_n(1),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(out.dataset.row_ids(), vec![RowId(0)]);
        assert_eq!(tool.seen.lock().unwrap().len(), 1);
    }
}
