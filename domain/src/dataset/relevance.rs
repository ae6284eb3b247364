//! Per-row relevance scores

use super::table::RowId;
use std::collections::HashMap;

/// Mapping from row identifier to a score in `[0, 1]`.
///
/// Rows without an entry are unscored: they sort as 0 but are not excluded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelevanceMap {
    scores: HashMap<RowId, f64>,
}

impl RelevanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score, clamped into `[0, 1]`. Non-finite scores are ignored.
    pub fn insert(&mut self, id: RowId, score: f64) {
        if score.is_finite() {
            self.scores.insert(id, score.clamp(0.0, 1.0));
        }
    }

    pub fn get(&self, id: RowId) -> Option<f64> {
        self.scores.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.scores.keys().copied()
    }
}

impl FromIterator<(RowId, f64)> for RelevanceMap {
    fn from_iter<T: IntoIterator<Item = (RowId, f64)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (id, score) in iter {
            map.insert(id, score);
        }
        map
    }
}
