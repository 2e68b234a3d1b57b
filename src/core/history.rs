//! Transition history tracking.
//!
//! Each machine keeps its own immutable history of fired transitions.
//! States are stored by their position in the transition table so the
//! history stays serializable even when states are closures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single fired transition.
///
/// # Example
///
/// ```rust
/// use arrowfsm::core::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: 0,
///     to: 1,
///     trigger: "go".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.is_default());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Table position of the state being left
    pub from: usize,
    /// Table position of the state being entered
    pub to: usize,
    /// Trigger key that selected the entry; empty for the default entry
    pub trigger: String,
    /// When the transition fired
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    /// Whether the default (trigger-less) entry was taken.
    pub fn is_default(&self) -> bool {
        self.trigger.is_empty()
    }
}

/// Ordered history of fired transitions.
///
/// History is immutable - `record` returns a new history with the
/// transition appended.
///
/// # Example
///
/// ```rust
/// use arrowfsm::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let history = StateHistory::new();
/// let history = history.record(StateTransition {
///     from: 0,
///     to: 1,
///     trigger: String::new(),
///     timestamp: Utc::now(),
/// });
/// let history = history.record(StateTransition {
///     from: 1,
///     to: 0,
///     trigger: "back".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![0, 1, 0]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Table positions traversed: the first source, then every target.
    pub fn get_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        for transition in &self.transitions {
            path.push(transition.to);
        }
        path
    }

    /// Time between the first and last transition, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(from: usize, to: usize, trigger: &str) -> StateTransition {
        StateTransition {
            from,
            to,
            trigger: trigger.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(step(0, 1, ""));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = StateHistory::new()
            .record(step(0, 1, ""))
            .record(step(1, 2, "go"));

        assert_eq!(history.get_path(), vec![0, 1, 2]);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(step(0, 1, ""));
        std::thread::sleep(std::time::Duration::from_millis(10));
        let history = history.record(step(1, 0, ""));

        let duration = history.duration();
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn default_trigger_is_flagged() {
        assert!(step(0, 1, "").is_default());
        assert!(!step(0, 1, "go").is_default());
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(step(3, 4, "tick"));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}
