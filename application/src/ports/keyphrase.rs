//! Keyphrase extraction port
//!
//! Turns a free-text question into search terms for keyword-driven tools.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyphraseError {
    #[error("Keyphrase extraction failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait KeyphraseExtractor: Send + Sync {
    /// Up to `max` keyphrases, most important first. An empty list is a valid
    /// result.
    async fn extract(&self, text: &str, max: usize) -> Result<Vec<String>, KeyphraseError>;
}
