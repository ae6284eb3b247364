//! Closed-set response constraint for classification
//!
//! The classifier may only answer with members of the candidate set computed
//! for the current request. [`CandidateConstraint`] carries that set in two
//! forms:
//!
//! - a JSON Schema whose `value` field is an `enum` of the delimited
//!   candidates, handed to the model as its structured-output shape
//! - a runtime check ([`CandidateConstraint::validate`]) applied to whatever
//!   comes back, so a provider that ignores the schema still cannot smuggle a
//!   foreign value through
//!
//! Candidates are wrapped as `<value>` in both the prompt and the schema. The
//! wrapping keeps the model copying the exact string; it is removed before the
//! value leaves this module.

use super::result::{CandidateMatch, ClassificationResult};
use crate::dataset::CandidateSet;
use serde_json::{Value, json};
use thiserror::Error;

const OPEN: char = '<';
const CLOSE: char = '>';

/// Maximum number of ranked matches a response may carry.
pub const MAX_MATCHES: usize = 3;

/// Ways a structured classification response can escape its constraint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeViolation {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("missing or mistyped field: {0}")]
    BadField(&'static str),

    #[error("expected at most {max} matches, got {got}")]
    TooManyMatches { max: usize, got: usize },

    #[error("value is not a candidate: {0}")]
    UnknownValue(String),

    #[error("duplicate value: {0}")]
    DuplicateValue(String),

    #[error("score {0} is outside [0, 1]")]
    ScoreOutOfRange(f64),
}

/// Response-shape constraint generated at call time from a [`CandidateSet`].
#[derive(Debug, Clone)]
pub struct CandidateConstraint {
    candidates: CandidateSet,
    delimited: Vec<String>,
}

impl CandidateConstraint {
    pub fn new(candidates: &CandidateSet) -> Self {
        Self {
            candidates: candidates.clone(),
            delimited: candidates.iter().map(delimit).collect(),
        }
    }

    /// Candidates in their delimited, prompt-facing form.
    pub fn delimited_values(&self) -> &[String] {
        &self.delimited
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// JSON Schema restricting every match value to the delimited candidates.
    pub fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reasoning": { "type": "string" },
                "matches": {
                    "type": "array",
                    "minItems": 1,
                    "maxItems": MAX_MATCHES,
                    "items": {
                        "type": "object",
                        "properties": {
                            "value": { "type": "string", "enum": self.delimited },
                            "score": { "type": "number", "minimum": 0.0, "maximum": 1.0 }
                        },
                        "required": ["value", "score"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["reasoning", "matches"],
            "additionalProperties": false
        })
    }

    /// Check a model response against the constraint and strip delimiters.
    ///
    /// The first offending match rejects the whole response.
    pub fn validate(&self, response: &Value) -> Result<ClassificationResult, ShapeViolation> {
        let object = response.as_object().ok_or(ShapeViolation::NotAnObject)?;

        let reasoning = match object.get("reasoning") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => String::new(),
            Some(_) => return Err(ShapeViolation::BadField("reasoning")),
        };

        let raw_matches = object
            .get("matches")
            .and_then(Value::as_array)
            .ok_or(ShapeViolation::BadField("matches"))?;

        if raw_matches.len() > MAX_MATCHES {
            return Err(ShapeViolation::TooManyMatches {
                max: MAX_MATCHES,
                got: raw_matches.len(),
            });
        }

        let mut matches: Vec<CandidateMatch> = Vec::with_capacity(raw_matches.len());
        for raw in raw_matches {
            let value = raw
                .get("value")
                .and_then(Value::as_str)
                .ok_or(ShapeViolation::BadField("matches[].value"))?;
            let score = raw
                .get("score")
                .and_then(Value::as_f64)
                .ok_or(ShapeViolation::BadField("matches[].score"))?;

            if !(0.0..=1.0).contains(&score) {
                return Err(ShapeViolation::ScoreOutOfRange(score));
            }

            let stripped = strip(value);
            if !self.candidates.contains(stripped) {
                return Err(ShapeViolation::UnknownValue(value.to_string()));
            }
            if matches.iter().any(|m| m.value == stripped) {
                return Err(ShapeViolation::DuplicateValue(stripped.to_string()));
            }
            matches.push(CandidateMatch::new(stripped, score));
        }

        Ok(ClassificationResult { reasoning, matches })
    }
}

/// Wrap a candidate in the prompt-facing delimiters.
pub fn delimit(value: &str) -> String {
    format!("{OPEN}{value}{CLOSE}")
}

/// Remove one pair of delimiters, if present. Inner text is left untouched.
pub fn strip(value: &str) -> &str {
    value
        .strip_prefix(OPEN)
        .and_then(|v| v.strip_suffix(CLOSE))
        .unwrap_or(value)
}
