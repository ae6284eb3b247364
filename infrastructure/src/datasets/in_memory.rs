//! In-memory dataset source, for embedding and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tabula_application::{DatasetSource, SourceError};
use tabula_domain::{Dataset, DatasetType};

/// Serves fixed tables. Each load returns a fresh copy.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatasetSource {
    tables: HashMap<DatasetType, Dataset>,
}

impl InMemoryDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, dataset: DatasetType, table: Dataset) -> Self {
        self.tables.insert(dataset, table);
        self
    }
}

#[async_trait]
impl DatasetSource for InMemoryDatasetSource {
    async fn load(&self, dataset: DatasetType) -> Result<Dataset, SourceError> {
        self.tables
            .get(&dataset)
            .cloned()
            .ok_or(SourceError::NotConfigured(dataset))
    }
}
