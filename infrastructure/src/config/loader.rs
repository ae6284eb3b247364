//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["tabula.toml", ".tabula.toml"];
const ENV_PREFIX: &str = "TABULA_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TABULA_*` environment variables (`__` separates sections,
    ///    e.g. `TABULA_LLM__MODEL`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./tabula.toml` or `./.tabula.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/tabula/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path, Self::global_config_path(), Self::project_config_path())
            .extract()
            .map_err(Box::new)
    }

    fn figment(
        config_path: Option<&PathBuf>,
        global: Option<PathBuf>,
        project: Option<PathBuf>,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = project {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load from a single file on top of the defaults, ignoring every other source.
    pub fn load_file(path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/tabula/config.toml if set,
    /// otherwise falls back to ~/.config/tabula/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tabula").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let marker = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", marker, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./tabula.toml or ./.tabula.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.strategies.top_n, 5);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("tabula"));
    }

    #[test]
    fn test_explicit_file_overrides_project_and_global() {
        let global = toml_file("[llm]\nmodel = \"global\"\ntimeout_seconds = 10\n");
        let project = toml_file("[llm]\nmodel = \"project\"\n");
        let explicit_file = toml_file("[llm]\nmodel = \"explicit\"\n");
        let explicit_path = explicit_file.path().to_path_buf();

        let config: FileConfig = ConfigLoader::figment(
            Some(&explicit_path),
            Some(global.path().to_path_buf()),
            Some(project.path().to_path_buf()),
        )
        .extract()
        .unwrap();

        assert_eq!(config.llm.model, "explicit");
        assert_eq!(config.llm.timeout_seconds, Some(10));
    }

    #[test]
    fn test_file_keeps_default_bindings() {
        let file = toml_file("[strategies.bindings]\nerrors = \"keyword\"\n");
        let config = ConfigLoader::load_file(file.path()).unwrap();

        assert_eq!(config.strategies.bindings.get("risks").map(String::as_str), Some("keyword"));
        assert_eq!(config.strategies.bindings.get("errors").map(String::as_str), Some("keyword"));
    }

    #[test]
    fn test_environment_overrides_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("tabula.toml", "[llm]\nmodel = \"from-file\"\n")?;
            jail.set_env("TABULA_LLM__MODEL", "from-env");
            jail.set_env("TABULA_STRATEGIES__TOP_N", "9");

            let config: FileConfig =
                ConfigLoader::figment(None, None, Some(PathBuf::from("tabula.toml"))).extract()?;

            assert_eq!(config.llm.model, "from-env");
            assert_eq!(config.strategies.top_n, 9);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_error() {
        let file = toml_file("[llm\nmodel = ");
        assert!(ConfigLoader::load_file(file.path()).is_err());
    }
}
