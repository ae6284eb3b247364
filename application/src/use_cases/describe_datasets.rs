//! Describe Datasets use case.
//!
//! Loads every dataset type concurrently and reports its classification axis,
//! filter strategy and size. Backs the `datasets` command.

use crate::config::PipelineConfig;
use crate::ports::dataset_source::DatasetSource;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tabula_domain::{DatasetType, ExtractAxis, Normalize, ProfileRegistry};
use tracing::{debug, warn};

/// What is known about one dataset type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub dataset: DatasetType,
    pub axis: String,
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Rows after normalization, when the load succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Distinct values in the axis column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct DescribeDatasetsUseCase {
    source: Arc<dyn DatasetSource>,
    profiles: ProfileRegistry,
    config: Arc<PipelineConfig>,
}

impl DescribeDatasetsUseCase {
    pub fn new(source: Arc<dyn DatasetSource>, config: Arc<PipelineConfig>) -> Self {
        Self {
            source,
            profiles: ProfileRegistry::builtin(),
            config,
        }
    }

    /// One summary per dataset type, in [`DatasetType::ALL`] order.
    pub async fn execute(&self) -> Vec<DatasetSummary> {
        join_all(DatasetType::ALL.into_iter().map(|d| self.describe(d))).await
    }

    async fn describe(&self, dataset: DatasetType) -> DatasetSummary {
        let strategy = self.config.strategies.strategy_name(dataset).to_string();
        let tool = self.config.strategies.tool_for(&strategy).map(str::to_string);
        let mut summary = DatasetSummary {
            dataset,
            axis: String::new(),
            strategy,
            tool,
            rows: None,
            candidates: None,
            error: None,
        };

        let profile = match self.profiles.get(dataset) {
            Ok(profile) => profile,
            Err(e) => {
                summary.error = Some(e.to_string());
                return summary;
            }
        };
        let axis = self.config.axis_for(dataset, profile.axis_column());
        summary.axis = axis.to_string();

        match self.source.load(dataset).await {
            Ok(raw) => {
                let normalized = profile.normalize(raw);
                summary.rows = Some(normalized.len());
                summary.candidates = Some(profile.extract(&normalized, axis).len());
                debug!("Described {}: {} rows", dataset, normalized.len());
            }
            Err(e) => {
                warn!("Could not load {}: {}", dataset, e);
                summary.error = Some(e.to_string());
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::dataset_source::SourceError;
    use async_trait::async_trait;
    use tabula_domain::Dataset;

    // ==================== Test Mocks ====================

    /// Only the risks dataset exists.
    struct RisksOnlySource;

    #[async_trait]
    impl DatasetSource for RisksOnlySource {
        async fn load(&self, dataset: DatasetType) -> Result<Dataset, SourceError> {
            match dataset {
                DatasetType::Risks => Ok(Dataset::from_table(
                    &["Наименование проекта"],
                    vec![vec!["Alpha".into()], vec!["Beta".into()], vec!["Alpha".into()]],
                )),
                other => Err(SourceError::NotConfigured(other)),
            }
        }
    }

    #[tokio::test]
    async fn test_describes_every_dataset_type() {
        let use_case = DescribeDatasetsUseCase::new(
            Arc::new(RisksOnlySource),
            Arc::new(PipelineConfig::default()),
        );

        let summaries = use_case.execute().await;

        assert_eq!(summaries.len(), 4);
        let risks = &summaries[1];
        assert_eq!(risks.dataset, DatasetType::Risks);
        assert_eq!(risks.axis, "project_name");
        assert_eq!(risks.strategy, "keyword");
        assert_eq!(risks.tool.as_deref(), Some("search_by_keywords"));
        assert_eq!(risks.rows, Some(3));
        assert_eq!(risks.candidates, Some(2));

        let errors = &summaries[2];
        assert_eq!(errors.strategy, "none");
        assert!(errors.error.is_some());
        assert_eq!(errors.rows, None);
    }
}
