//! Domain records built from retained rows, and their ordering

pub mod entities;

pub use entities::{Contractor, DomainRecord, Process, ProjectError, RecordError, Risk};

use std::cmp::Ordering;

/// Sort records by descending relevance.
///
/// Unscored records count as 0. The sort is stable, so records with equal
/// scores keep their incoming order.
pub fn sort_by_relevance(records: &mut [DomainRecord]) {
    records.sort_by(|a, b| {
        let a = a.relevance_score().unwrap_or(0.0);
        let b = b.relevance_score().unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
}
