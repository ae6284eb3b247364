//! Dataset source port
//!
//! Raw tables are loaded per request from whatever backs a dataset type. The
//! port returns rows exactly as stored; column unification and text cleanup
//! happen in the domain profiles.

use async_trait::async_trait;
use tabula_domain::{Dataset, DatasetType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Dataset '{dataset}' is unavailable: {reason}")]
    Unavailable {
        dataset: DatasetType,
        reason: String,
    },

    #[error("Dataset '{dataset}' is malformed: {reason}")]
    Malformed {
        dataset: DatasetType,
        reason: String,
    },

    #[error("No source configured for dataset '{0}'")]
    NotConfigured(DatasetType),
}

/// Loader for the raw table behind a dataset type.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn load(&self, dataset: DatasetType) -> Result<Dataset, SourceError>;
}
