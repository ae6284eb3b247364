//! CLI entrypoint for tabula
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser};
use std::sync::Arc;
use tabula_application::{
    DescribeDatasetsUseCase, KeyphraseExtractor, LlmGateway, NoProgress, PipelineConfig,
    PipelineEventLogger, PipelineProgress, RunPipelineUseCase,
};
use tabula_domain::{DatasetType, FilterStrategy, ToolRegistry};
use tabula_infrastructure::{
    ConfigLoader, FileConfig, FileKeyphraseExtractor, FileOutputFormat, JsonFileDatasetSource,
    JsonSchemaToolConverter, JsonlPipelineLogger, LlmKeyphraseExtractor, OpenAiCompatibleGateway,
    StatisticalKeyphraseExtractor, default_registry,
};
use tabula_presentation::{Cli, Command, ConsoleFormatter, OutputFormat, StageProgressReporter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"), // -vvv or more
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("Failed to load configuration: {e}"))
}

fn dataset_source(config: &FileConfig) -> Arc<JsonFileDatasetSource> {
    let source = DatasetType::ALL
        .iter()
        .fold(JsonFileDatasetSource::new(), |source, dataset| {
            source.with_path(*dataset, config.datasets.path_for(*dataset))
        });
    Arc::new(source)
}

/// Warn about strategies that can never run.
fn check_bindings(config: &PipelineConfig, tools: &ToolRegistry) {
    for dataset in DatasetType::ALL {
        match config.strategies.resolve(dataset) {
            Ok(FilterStrategy::ToolBound { strategy, tool }) if !tools.contains(&tool) => {
                warn!(
                    "Strategy '{}' for {} uses unregistered tool '{}'; it will be skipped",
                    strategy, dataset, tool
                );
            }
            Err(e) => warn!("{}", e),
            _ => {}
        }
    }
}

fn gateway(config: &FileConfig) -> Result<Arc<dyn LlmGateway>> {
    let gateway = OpenAiCompatibleGateway::new(
        &config.llm.base_url,
        &config.llm.model,
        config.llm.timeout_seconds.map(std::time::Duration::from_secs),
    )
    .context("Failed to create LLM client")?
    .with_api_key(config.llm.resolve_api_key())
    .with_strict_schemas(config.llm.strict_schemas);
    Ok(Arc::new(gateway))
}

fn keyphrase_extractor(
    config: &FileConfig,
    gateway: Arc<dyn LlmGateway>,
) -> Arc<dyn KeyphraseExtractor> {
    match config.strategies.keyphrases {
        FileKeyphraseExtractor::Statistical => Arc::new(StatisticalKeyphraseExtractor::new()),
        FileKeyphraseExtractor::Llm => Arc::new(LlmKeyphraseExtractor::new(gateway)),
    }
}

fn event_logger(config: &FileConfig) -> Option<Arc<dyn PipelineEventLogger>> {
    let path = config.logging.jsonl.as_ref()?;
    match JsonlPipelineLogger::new(path) {
        Some(logger) => Some(Arc::new(logger)),
        None => {
            warn!("Event log disabled: cannot open {}", path.display());
            None
        }
    }
}

/// Cancel in-flight work on Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            trigger.cancel();
        }
    });
    token
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let file_config = load_config(&cli)?;
    let pipeline_config = file_config
        .to_pipeline_config()
        .context("Invalid configuration")?;

    if !file_config.output.color {
        colored::control::set_override(false);
    }
    let format = cli.output.unwrap_or(match file_config.output.format {
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Text,
    });

    // === Dependency Injection ===
    let tools = Arc::new(default_registry()?);
    check_bindings(&pipeline_config, &tools);

    let params = command.extra_params();
    match command {
        Command::Tools => {
            let definitions = tools.definitions();
            let output = match format {
                OutputFormat::Text => ConsoleFormatter::format_tools(&definitions),
                OutputFormat::Json => {
                    let converter = JsonSchemaToolConverter;
                    let described: Vec<_> =
                        definitions.iter().map(|d| converter.describe(d)).collect();
                    ConsoleFormatter::format_json(&described)
                }
            };
            println!("{}", output);
        }

        Command::Datasets => {
            let use_case =
                DescribeDatasetsUseCase::new(dataset_source(&file_config), Arc::new(pipeline_config));
            let summaries = use_case.execute().await;
            let output = match format {
                OutputFormat::Text => ConsoleFormatter::format_datasets(&summaries),
                OutputFormat::Json => ConsoleFormatter::format_json(&summaries),
            };
            println!("{}", output);
        }

        Command::Ask {
            question, dataset, ..
        } => {
            info!("Starting tabula ({} @ {})", file_config.llm.model, file_config.llm.base_url);

            let gateway = gateway(&file_config)?;
            let keyphrases = keyphrase_extractor(&file_config, gateway.clone());

            let mut use_case = RunPipelineUseCase::new(
                gateway,
                dataset_source(&file_config),
                keyphrases,
                tools,
                Arc::new(JsonSchemaToolConverter),
                pipeline_config,
            )
            .with_shutdown_token(cancel_on_ctrl_c());
            if let Some(logger) = event_logger(&file_config) {
                use_case = use_case.with_event_logger(logger);
            }

            let progress: Box<dyn PipelineProgress> = if cli.quiet || format == OutputFormat::Json {
                Box::new(NoProgress)
            } else {
                Box::new(StageProgressReporter::new())
            };

            let answer = use_case
                .process_with_progress(&question, dataset, params, progress.as_ref())
                .await;

            let output = match format {
                OutputFormat::Text => ConsoleFormatter::format(&answer),
                OutputFormat::Json => ConsoleFormatter::format_json(&answer),
            };
            println!("{}", output);
        }
    }

    Ok(())
}
