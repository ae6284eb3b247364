//! Answer entity, its metadata and the composition state machine

pub mod entities;
pub mod phase;

pub use entities::{Answer, AnswerMetadata, Provenance};
pub use phase::ComposePhase;
