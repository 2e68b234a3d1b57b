//! Checkpoint and resume for running machines.
//!
//! A checkpoint captures where a machine is, not what it can do: states
//! are stored by table position and the transition table is supplied
//! again on resume.

use crate::compiler::Definition;
use crate::core::StateHistory;
use crate::machine::Machine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine.
/// Does NOT include the transition table (behaviors are not serializable).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Table position of the start state
    pub start: usize,

    /// Table position of the current state
    pub current: usize,

    /// Label of the current state, checked on resume
    pub current_label: String,

    /// Complete transition history
    pub history: StateHistory,
}

impl Checkpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }
}

impl Machine {
    /// Snapshot the machine's position and history.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            start: self.start_position(),
            current: self.current_position(),
            current_label: self.current_state().label(),
            history: self.history().clone(),
        }
    }

    /// Rebuild a machine from a checkpoint taken on the same diagram.
    pub fn resume(
        definition: &Definition,
        checkpoint: Checkpoint,
    ) -> Result<Self, CheckpointError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let states = definition.table().len();
        if let Some(t) = checkpoint
            .history
            .transitions()
            .iter()
            .find(|t| t.from >= states || t.to >= states)
        {
            return Err(CheckpointError::HistoryOutOfRange {
                from: t.from,
                to: t.to,
                states,
            });
        }

        if let Some(position) = [checkpoint.start, checkpoint.current]
            .into_iter()
            .find(|&position| position >= states)
        {
            return Err(CheckpointError::PositionOutOfRange { position, states });
        }

        let position = checkpoint.current;
        let machine = Machine::restore(
            definition.clone(),
            checkpoint.start,
            checkpoint.current,
            checkpoint.history,
        )
        .ok_or(CheckpointError::PositionOutOfRange { position, states })?;

        let label = machine.current_state().label();
        if label != checkpoint.current_label {
            return Err(CheckpointError::LabelMismatch {
                position,
                expected: checkpoint.current_label,
                found: label,
            });
        }

        tracing::debug!(id = %checkpoint.id, state = %label, "resumed machine");
        Ok(machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{Source, Symbols};
    use crate::core::{Ident, StateTransition};

    fn definition(text: &str) -> Definition {
        Definition::compile(&Source::text(text, &Symbols::new())).unwrap()
    }

    fn advanced_machine(definition: &Definition) -> Machine {
        let mut machine = definition.machine(&Ident::text("A")).unwrap();
        machine.fire("go", &[]).unwrap();
        machine
    }

    #[test]
    fn json_roundtrip_resumes_at_same_state() {
        let definition = definition("A -> B @ go\nB -> C @ go");
        let machine = advanced_machine(&definition);

        let json = machine.checkpoint().to_json().unwrap();
        let checkpoint = Checkpoint::from_json(&json).unwrap();
        let mut resumed = Machine::resume(&definition, checkpoint).unwrap();

        assert_eq!(resumed.current_state(), &Ident::text("B"));
        assert_eq!(resumed.history().len(), 1);

        resumed.fire("go", &[]).unwrap();
        assert_eq!(resumed.current_state(), &Ident::text("C"));
    }

    #[test]
    fn binary_roundtrip_preserves_checkpoint() {
        let definition = definition("A -> B @ go");
        let checkpoint = advanced_machine(&definition).checkpoint();

        let bytes = checkpoint.to_binary().unwrap();

        assert_eq!(Checkpoint::from_binary(&bytes).unwrap(), checkpoint);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let definition = definition("A -> B @ go");
        let mut checkpoint = advanced_machine(&definition).checkpoint();
        checkpoint.version = 99;

        assert!(matches!(
            Machine::resume(&definition, checkpoint),
            Err(CheckpointError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn checkpoint_from_other_diagram_is_rejected() {
        let checkpoint = advanced_machine(&definition("A -> B @ go")).checkpoint();
        let other = definition("A -> Z @ go");

        assert!(matches!(
            Machine::resume(&other, checkpoint),
            Err(CheckpointError::LabelMismatch { position: 1, .. })
        ));
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let definition = definition("A -> B @ go");
        let mut checkpoint = advanced_machine(&definition).checkpoint();
        checkpoint.current = 7;

        assert!(matches!(
            Machine::resume(&definition, checkpoint),
            Err(CheckpointError::PositionOutOfRange { position: 7, states: 2 })
        ));
    }

    #[test]
    fn history_past_the_table_is_rejected() {
        let definition = definition("A -> B @ go");
        let mut checkpoint = advanced_machine(&definition).checkpoint();
        checkpoint.history = checkpoint.history.record(StateTransition {
            from: 1,
            to: 5,
            trigger: "go".to_string(),
            timestamp: Utc::now(),
        });

        assert!(matches!(
            Machine::resume(&definition, checkpoint),
            Err(CheckpointError::HistoryOutOfRange { from: 1, to: 5, states: 2 })
        ));
    }

    #[test]
    fn checkpoint_ids_are_unique() {
        let machine = advanced_machine(&definition("A -> B @ go"));

        assert_ne!(machine.checkpoint().id, machine.checkpoint().id);
    }
}
