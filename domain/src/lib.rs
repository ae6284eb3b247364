//! Domain layer for tabula
//!
//! This crate contains the data model, the classification constraint, the
//! tool contract and the per-dataset-type profiles. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Closed-set classification
//!
//! A question is routed to one value of a dataset column (a project, a work
//! type, a process). The valid values are computed per request as a
//! [`CandidateSet`], and a [`CandidateConstraint`] restricts the model's
//! structured answer to exactly those values.
//!
//! ## Strategy-bound filtering
//!
//! After classification, a dataset type either keeps the rows matching the
//! classified value ([`FilterStrategy::Direct`]) or hands them to a named
//! [`FilterTool`] that scores and re-filters them.
//!
//! ## Profiles
//!
//! Each [`DatasetType`] has a [`DatasetProfile`] implementing the
//! [`Normalize`], [`ExtractAxis`] and [`Compose`] roles.

pub mod answer;
pub mod classification;
pub mod core;
pub mod dataset;
pub mod filtering;
pub mod pipeline;
pub mod profile;
pub mod prompt;
pub mod record;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use answer::{Answer, AnswerMetadata, ComposePhase, Provenance};
pub use classification::{
    CandidateConstraint, CandidateMatch, ClassificationResult, MAX_MATCHES, ShapeViolation,
};
pub use core::{error::DomainError, question::Question};
pub use dataset::{
    CandidateSet, Cell, Dataset, DatasetType, RelevanceMap, RiskCategory, Row, RowId,
};
pub use filtering::{
    ArgumentSource, FilterStrategy, NONE_STRATEGY, StrategyBindings, StrategyError,
    filter_by_value,
};
pub use pipeline::{ExtraParams, Stage};
pub use profile::{
    Compose, ContractorsProfile, DatasetProfile, ErrorsProfile, ExtractAxis, Normalize,
    ProcessesProfile, ProfileRegistry, RisksProfile,
};
pub use prompt::{PromptPair, PromptTemplate};
pub use record::{
    Contractor, DomainRecord, Process, ProjectError, RecordError, Risk, sort_by_relevance,
};
pub use tool::{
    DefaultToolValidator, FilterTool, RegistryError, ToolArgs, ToolDefinition, ToolError,
    ToolOutput, ToolParameter, ToolRegistry, ToolValidator,
};
