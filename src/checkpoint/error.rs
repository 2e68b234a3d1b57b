//! Errors raised while saving or resuming a machine checkpoint.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("could not serialize checkpoint: {0}")]
    SerializationFailed(String),

    #[error("could not deserialize checkpoint: {0}")]
    DeserializationFailed(String),

    #[error("checkpoint version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A history entry points past the end of the table.
    #[error("history entry {from} -> {to} is outside a table of {states} states")]
    HistoryOutOfRange { from: usize, to: usize, states: usize },

    /// The saved start or current position has no state in the table.
    #[error("position {position} is outside a table of {states} states")]
    PositionOutOfRange { position: usize, states: usize },

    /// The table holds a different state at the saved position.
    #[error("state at position {position} is '{found}', checkpoint recorded '{expected}'")]
    LabelMismatch {
        position: usize,
        expected: String,
        found: String,
    },
}
