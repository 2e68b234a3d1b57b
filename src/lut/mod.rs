//! Dense, array-friendly views of a transition table.

mod index;
mod matrix;
mod stats;

pub use index::IndexTable;
pub use matrix::Lut;
pub use stats::Stats;
