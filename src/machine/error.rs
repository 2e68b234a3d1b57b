//! Runtime dispatch errors.

use thiserror::Error;

/// Errors that can occur while starting or firing a machine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State '{state}' is not part of the diagram")]
    UnknownState { state: String },

    #[error("No transition for trigger '{trigger}' from state '{state}'")]
    NoTransition { state: String, trigger: String },
}
