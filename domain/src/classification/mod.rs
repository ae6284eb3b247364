//! Constrained classification: closed-set response shape and its result

pub mod constraint;
pub mod result;

pub use constraint::{CandidateConstraint, MAX_MATCHES, ShapeViolation, delimit, strip};
pub use result::{CandidateMatch, ClassificationResult};
