//! CandidateSet value object

use super::table::Dataset;
use serde::Serialize;

/// The closed list of valid classification values for one request.
///
/// Values are trimmed, non-empty and unique, in first-seen order. Membership
/// is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CandidateSet {
    values: Vec<String>,
}

impl CandidateSet {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for value in values {
            set.insert(value.as_ref());
        }
        set
    }

    /// Distinct non-null values of `column`. A missing column yields an empty set.
    pub fn from_column(dataset: &Dataset, column: &str) -> Self {
        let mut set = Self::default();
        for cell in dataset.column_values(column) {
            if let Some(value) = cell.non_blank() {
                set.insert(&value);
            }
        }
        set
    }

    fn insert(&mut self, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !self.contains(value) {
            self.values.push(value.to_string());
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}
