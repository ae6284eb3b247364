//! Classification result value objects

use serde::{Deserialize, Serialize};

/// One ranked match returned by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    /// A verbatim member of the candidate set, delimiters already removed
    pub value: String,
    /// Confidence in `[0, 1]`
    pub score: f64,
}

impl CandidateMatch {
    pub fn new(value: impl Into<String>, score: f64) -> Self {
        Self {
            value: value.into(),
            score,
        }
    }
}

/// Validated classifier output for a single request.
///
/// Only [`CandidateConstraint::validate`](super::CandidateConstraint::validate)
/// builds one from model output, so every `value` is a member of the set the
/// constraint was created from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub reasoning: String,
    pub matches: Vec<CandidateMatch>,
}

impl ClassificationResult {
    /// Value with the highest score. Ties go to the earlier match.
    pub fn best_value(&self) -> Option<&str> {
        let mut best: Option<&CandidateMatch> = None;
        for candidate in &self.matches {
            match best {
                Some(current) if candidate.score <= current.score => {}
                _ => best = Some(candidate),
            }
        }
        best.map(|m| m.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_value_picks_highest_score() {
        let result = ClassificationResult {
            reasoning: String::new(),
            matches: vec![
                CandidateMatch::new("Beta", 0.4),
                CandidateMatch::new("Alpha", 0.9),
                CandidateMatch::new("Gamma", 0.1),
            ],
        };
        assert_eq!(result.best_value(), Some("Alpha"));
    }

    #[test]
    fn test_best_value_tie_keeps_first() {
        let result = ClassificationResult {
            reasoning: String::new(),
            matches: vec![
                CandidateMatch::new("Beta", 0.5),
                CandidateMatch::new("Alpha", 0.5),
            ],
        };
        assert_eq!(result.best_value(), Some("Beta"));
    }

    #[test]
    fn test_best_value_empty() {
        assert_eq!(ClassificationResult::default().best_value(), None);
    }
}
