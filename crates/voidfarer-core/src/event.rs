//! Event classification tags returned across the transport boundary.
//!
//! Every action resolution carries exactly one [`EventKind`] so callers
//! can style or route the message without parsing it. The engine never
//! formats for a specific UI; it emits plain strings plus these tags.

use serde::{Deserialize, Serialize};

/// Classification tag for an action outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Info,
    Error,
    Success,
    Danger,
    Warning,
    Navigation,
    Combat,
    CombatStart,
    CombatEnd,
    PodActivated,
    FleeSuccess,
    FleeFailed,
    NegotiateSuccess,
    NegotiateFailed,
    Purchase,
    Repair,
    Heal,
    GameOver,
    Victory,
    Quest,
}

impl EventKind {
    /// Whether this kind marks a terminal game state.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventKind::GameOver | EventKind::Victory)
    }
}

/// Structured result of resolving one player action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Human-readable event text. Rendering is entirely the caller's job.
    pub message: String,
    /// Classification tag for the event.
    pub kind: EventKind,
    /// Follow-up choices to present to the player, if any.
    pub choices: Vec<String>,
    /// Whether the action took effect. Validation and resource failures
    /// report `false` with the state unchanged.
    pub success: bool,
}

impl ActionOutcome {
    pub fn new(message: impl Into<String>, kind: EventKind) -> Self {
        Self {
            message: message.into(),
            kind,
            choices: Vec::new(),
            success: true,
        }
    }

    /// A failed validation or resource check. State must be unchanged.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: EventKind::Error,
            choices: Vec::new(),
            success: false,
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&EventKind::PodActivated).unwrap(),
            "\"pod_activated\""
        );
        assert_eq!(
            serde_json::to_string(&EventKind::NegotiateFailed).unwrap(),
            "\"negotiate_failed\""
        );
    }

    #[test]
    fn terminal_kinds() {
        assert!(EventKind::GameOver.is_terminal());
        assert!(EventKind::Victory.is_terminal());
        assert!(!EventKind::Combat.is_terminal());
    }

    #[test]
    fn error_outcome_is_unsuccessful() {
        let outcome = ActionOutcome::error("no fuel");
        assert!(!outcome.success);
        assert_eq!(outcome.kind, EventKind::Error);
        assert!(outcome.choices.is_empty());
    }
}
