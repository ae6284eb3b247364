//! Dataset locations from TOML (`[datasets]` section)
//!
//! ```toml
//! [datasets]
//! dir = "data"
//!
//! [datasets.risks]
//! path = "exports/risks-2024.json"
//! max_results = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tabula_domain::DatasetType;

/// Per-dataset-type settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatasetConfig {
    /// File path; defaults to `<dir>/<type>.json`
    pub path: Option<PathBuf>,
    /// Records kept in the answer
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatasetsConfig {
    /// Directory holding `<type>.json` files
    pub dir: PathBuf,
    pub contractors: FileDatasetConfig,
    pub risks: FileDatasetConfig,
    pub errors: FileDatasetConfig,
    pub processes: FileDatasetConfig,
}

impl Default for FileDatasetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            contractors: FileDatasetConfig::default(),
            risks: FileDatasetConfig::default(),
            errors: FileDatasetConfig::default(),
            processes: FileDatasetConfig::default(),
        }
    }
}

impl FileDatasetsConfig {
    pub fn entry(&self, dataset: DatasetType) -> &FileDatasetConfig {
        match dataset {
            DatasetType::Contractors => &self.contractors,
            DatasetType::Risks => &self.risks,
            DatasetType::Errors => &self.errors,
            DatasetType::Processes => &self.processes,
        }
    }

    pub fn path_for(&self, dataset: DatasetType) -> PathBuf {
        self.entry(dataset)
            .path
            .clone()
            .unwrap_or_else(|| self.dir.join(format!("{dataset}.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_defaults_to_dir() {
        let toml_str = r#"
[datasets]
dir = "/srv/tabula"

[datasets.risks]
path = "exports/risks.json"
max_results = 10
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let datasets = &config.datasets;
        assert_eq!(
            datasets.path_for(DatasetType::Risks),
            PathBuf::from("exports/risks.json")
        );
        assert_eq!(
            datasets.path_for(DatasetType::Errors),
            PathBuf::from("/srv/tabula/errors.json")
        );
        assert_eq!(datasets.entry(DatasetType::Risks).max_results, Some(10));
        assert_eq!(datasets.entry(DatasetType::Contractors).max_results, None);
    }
}
