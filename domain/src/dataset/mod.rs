//! Tabular data model
//!
//! - [`Dataset`] / [`Row`] / [`RowId`]: a table whose rows keep their identity
//!   through every transform
//! - [`Cell`]: nullable text or numeric scalar
//! - [`CandidateSet`]: closed set of classification values from one column
//! - [`RelevanceMap`]: scores keyed by [`RowId`]
//! - [`DatasetType`] / [`RiskCategory`]: what a dataset holds

pub mod candidates;
pub mod cell;
pub mod kind;
pub mod relevance;
pub mod table;

pub use candidates::CandidateSet;
pub use cell::Cell;
pub use kind::{DatasetType, RiskCategory};
pub use relevance::RelevanceMap;
pub use table::{Dataset, Row, RowId};
