//! Answer composition state machine

use super::entities::Provenance;
use serde::{Deserialize, Serialize};

/// Per-request composition state.
///
/// `Started → Converting → Prompting → (Succeeded | FallbackUsed) → Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposePhase {
    Started,
    Converting,
    Prompting,
    Succeeded,
    FallbackUsed,
    Done,
}

impl ComposePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposePhase::Started => "started",
            ComposePhase::Converting => "converting",
            ComposePhase::Prompting => "prompting",
            ComposePhase::Succeeded => "succeeded",
            ComposePhase::FallbackUsed => "fallback_used",
            ComposePhase::Done => "done",
        }
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: ComposePhase) -> bool {
        use ComposePhase::*;
        matches!(
            (self, next),
            (Started, Converting)
                | (Converting, Prompting)
                | (Prompting, Succeeded)
                | (Prompting, FallbackUsed)
                | (Succeeded, Done)
                | (FallbackUsed, Done)
        )
    }

    /// The provenance a terminal phase stands for.
    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            ComposePhase::Succeeded => Some(Provenance::Generated),
            ComposePhase::FallbackUsed => Some(Provenance::Fallback),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComposePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            ComposePhase::Started,
            ComposePhase::Converting,
            ComposePhase::Prompting,
            ComposePhase::Succeeded,
            ComposePhase::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!ComposePhase::Started.can_transition_to(ComposePhase::Prompting));
        assert!(!ComposePhase::Succeeded.can_transition_to(ComposePhase::FallbackUsed));
        assert!(!ComposePhase::Done.can_transition_to(ComposePhase::Started));
    }

    #[test]
    fn test_provenance_of_terminal_phases() {
        assert_eq!(ComposePhase::FallbackUsed.provenance(), Some(Provenance::Fallback));
        assert_eq!(ComposePhase::Prompting.provenance(), None);
    }
}
