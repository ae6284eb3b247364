//! Keyphrase extractors
//!
//! Implementations of [`KeyphraseExtractor`](tabula_application::KeyphraseExtractor):
//!
//! - [`StatisticalKeyphraseExtractor`]: frequency ranking over non-stopword
//!   tokens, no model call
//! - [`LlmKeyphraseExtractor`]: asks the model, falls back to the statistical
//!   extractor when the call fails

mod llm;
mod statistical;

pub use llm::LlmKeyphraseExtractor;
pub use statistical::StatisticalKeyphraseExtractor;
