//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tabula_domain::{DatasetType, ExtraParams, RiskCategory};

/// Output format for answers and listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

fn parse_dataset(s: &str) -> Result<DatasetType, String> {
    s.parse().map_err(|e: tabula_domain::DomainError| e.to_string())
}

fn parse_risk_category(s: &str) -> Result<RiskCategory, String> {
    s.parse().map_err(|e: tabula_domain::DomainError| e.to_string())
}

/// CLI arguments for tabula
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(author, version, about = "Answer questions over tabular datasets with an LLM")]
#[command(long_about = r#"
Tabula answers natural-language questions about contractors, risks, project
errors and business processes.

Each question runs through a fixed pipeline:
1. Load and normalize the dataset
2. Classify the question against the values of one column
3. Filter rows by the result (optionally refined by a tool such as keyword search)
4. Compose a Markdown answer from the remaining rows

Configuration files are loaded from (in priority order):
1. TABULA_* environment variables
2. --config <path>     Explicit config file
3. ./tabula.toml       Project-level config
4. ~/.config/tabula/config.toml   Global config

Example:
  tabula ask --dataset risks "What supplier risks does project Alpha have?"
  tabula ask --dataset contractors -o json "Who does concrete work?"
  tabula datasets
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask a question about one dataset
    Ask {
        /// The question
        question: String,

        /// Dataset to search (contractors, risks, errors, processes)
        #[arg(short, long, value_parser = parse_dataset)]
        dataset: DatasetType,

        /// Restrict risks to one project category (niokr, product_project, manufacturing)
        #[arg(long, value_parser = parse_risk_category)]
        risk_category: Option<RiskCategory>,

        /// Maximum records in the answer
        #[arg(short, long)]
        limit: Option<usize>,

        /// Rows kept by keyword search
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// List datasets with their classification column and filter strategy
    Datasets,

    /// List registered filter tools and their parameter schemas
    Tools,
}

impl Command {
    /// Per-request parameters for `ask`.
    pub fn extra_params(&self) -> ExtraParams {
        let mut params = ExtraParams::new();
        if let Command::Ask {
            risk_category,
            limit,
            top_n,
            ..
        } = self
        {
            if let Some(category) = risk_category {
                params = params.with_risk_category(*category);
            }
            if let Some(limit) = limit {
                params = params.with_limit(*limit);
            }
            if let Some(top_n) = top_n {
                params = params.with_top_n(*top_n);
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "tabula",
            "-vv",
            "ask",
            "--dataset",
            "Risks",
            "--risk-category",
            "niokr",
            "--limit",
            "3",
            "supplier delays?",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let command = cli.command.unwrap();
        assert_eq!(
            command,
            Command::Ask {
                question: "supplier delays?".to_string(),
                dataset: DatasetType::Risks,
                risk_category: Some(RiskCategory::Niokr),
                limit: Some(3),
                top_n: None,
            }
        );
        assert_eq!(
            command.extra_params(),
            ExtraParams::new()
                .with_risk_category(RiskCategory::Niokr)
                .with_limit(3)
        );
    }

    #[test]
    fn test_unknown_dataset_is_rejected() {
        let result = Cli::try_parse_from(["tabula", "ask", "--dataset", "suppliers", "q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_output_flag() {
        let cli = Cli::try_parse_from(["tabula", "datasets", "-o", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.command, Some(Command::Datasets));
    }
}
