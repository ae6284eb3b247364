//! Prompt domain
//!
//! Templates for every model call the pipeline makes: classification, answer
//! composition, tool argument derivation and keyphrase extraction.

mod template;

pub use template::{PromptPair, PromptTemplate};
