//! Configuration file loading for tabula
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TABULA_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tabula.toml` or `./.tabula.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/tabula/config.toml`
//! 5. Fallback: `~/.config/tabula/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDatasetConfig, FileDatasetsConfig,
    FileKeyphraseExtractor, FileLlmConfig, FileLoggingConfig, FileOutputConfig, FileOutputFormat,
    FilePipelineConfig, FileStrategiesConfig,
};
pub use loader::ConfigLoader;
