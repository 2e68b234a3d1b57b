//! Codec error types.

use thiserror::Error;

/// Errors that can occur while encoding or decoding lookup tables
#[derive(Debug, Error)]
pub enum CodecError {
    /// Layout or operation that has no defined format yet
    #[error("Not implemented: {0}")]
    Unimplemented(&'static str),

    /// Buffer does not match the shape recorded in the source map
    #[error("Buffer holds {found} cells, source map expects {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    /// Cell refers to a state index outside the table
    #[error("Cell {cell} points to state {value}, but only {states} states exist")]
    CellOutOfRange {
        cell: usize,
        value: u32,
        states: usize,
    },

    /// Row permutation is not a permutation of the row indices
    #[error("Invalid row permutation: {0}")]
    InvalidPermutation(String),

    /// Index does not fit the fixed-width cell type
    #[error("State index {0} does not fit in a u32 cell")]
    Overflow(usize),

    /// Serialization to binary or JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from binary or JSON failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}
