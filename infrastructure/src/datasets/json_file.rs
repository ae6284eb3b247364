//! JSON file dataset source
//!
//! Each dataset type maps to one file holding an array of flat objects, one
//! per row, as exported from the source spreadsheets:
//!
//! ```json
//! [
//!   {"Наименование проекта": "Alpha", "Риск": "Supplier delay", "№ проекта": 17},
//!   {"Наименование проекта": "Beta", "Риск": null}
//! ]
//! ```
//!
//! Column names are kept as stored; profiles rename them later. Rows keep
//! file order, which fixes their ids.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tabula_application::{DatasetSource, SourceError};
use tabula_domain::{Cell, Dataset, DatasetType};
use tracing::{debug, info};

fn cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::String(s) => Cell::Text(s),
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        Value::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

/// Turn a JSON array of objects into a dataset.
///
/// Anything else is reported as a reason string for
/// [`SourceError::Malformed`].
pub fn parse_records(value: Value) -> Result<Dataset, String> {
    let Value::Array(items) = value else {
        return Err("expected a JSON array of row objects".to_string());
    };

    let mut dataset = Dataset::default();
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(format!("row {index} is not an object"));
        };
        dataset.push_named(fields.into_iter().map(|(k, v)| (k, cell(v))));
    }
    Ok(dataset)
}

/// Loads each dataset type from its own JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonFileDatasetSource {
    paths: HashMap<DatasetType, PathBuf>,
}

impl JsonFileDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<dir>/<type>.json` for every dataset type.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        DatasetType::ALL.iter().fold(Self::new(), |source, dataset| {
            source.with_path(*dataset, dir.join(format!("{dataset}.json")))
        })
    }

    pub fn with_path(mut self, dataset: DatasetType, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(dataset, path.into());
        self
    }

    pub fn path(&self, dataset: DatasetType) -> Option<&Path> {
        self.paths.get(&dataset).map(PathBuf::as_path)
    }
}

#[async_trait]
impl DatasetSource for JsonFileDatasetSource {
    async fn load(&self, dataset: DatasetType) -> Result<Dataset, SourceError> {
        let path = self
            .paths
            .get(&dataset)
            .ok_or(SourceError::NotConfigured(dataset))?;

        debug!("Loading {} from {}", dataset, path.display());
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SourceError::Unavailable {
                dataset,
                reason: format!("{}: {}", path.display(), e),
            })?;

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| SourceError::Malformed {
                dataset,
                reason: format!("{}: {}", path.display(), e),
            })?;

        let table = parse_records(value).map_err(|reason| SourceError::Malformed {
            dataset,
            reason: format!("{}: {}", path.display(), reason),
        })?;

        info!(
            "Loaded {} rows ({} columns) for {}",
            table.len(),
            table.columns().len(),
            dataset
        );
        Ok(table)
    }
}
