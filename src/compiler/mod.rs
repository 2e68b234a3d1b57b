//! Diagram compiler.
//!
//! Turns arrow diagrams (`A -> B`, `A <- B`, `A <-> B`, optionally
//! `@ event`) into a shareable [`Definition`]:
//!
//! source text -> [`Line`]s -> [`TransitionTable`] -> machines, index
//! tables, lookup matrices and encoded buffers.

pub mod error;
pub mod lint;
pub mod parser;
pub mod source;
pub mod table;

pub use error::SyntaxError;
pub use parser::{parse, Arrow, Line};
pub use source::{Source, Symbols, Token};
pub use table::{Action, Transition, TransitionTable, Transitions, DEFAULT_TRIGGER};

use crate::core::Ident;
use crate::lut::{IndexTable, Lut, Stats};
use crate::machine::{Machine, MachineError};
use std::sync::Arc;

/// A compiled diagram.
///
/// The transition table is immutable and reference-counted: cloning a
/// definition or starting machines from it never copies the table.
///
/// # Example
///
/// ```rust
/// use arrowfsm::compiler::{Definition, Source, Symbols};
/// use arrowfsm::core::Ident;
///
/// let definition = Definition::compile(&Source::text(
///     "Red -> Green @ go\nGreen -> Red @ stop",
///     &Symbols::new(),
/// ))
/// .unwrap();
///
/// let mut light = definition.machine(&Ident::text("Red")).unwrap();
/// light.fire("go", &[]).unwrap();
/// assert_eq!(light.current_state(), &Ident::text("Green"));
/// ```
#[derive(Clone, Debug)]
pub struct Definition {
    table: Arc<TransitionTable>,
}

impl Definition {
    /// Parse and build a diagram, aborting at the first malformed line.
    pub fn compile(source: &Source) -> Result<Self, SyntaxError> {
        let lines = parse(source)?;
        let table = TransitionTable::build(&lines)?;
        tracing::debug!(
            lines = lines.len(),
            states = table.len(),
            "compiled state diagram"
        );
        Ok(Self::from_table(table))
    }

    /// Wrap an already built table.
    pub fn from_table(table: TransitionTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// The transition table, for introspection and serialization.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Start a machine in `start`.
    pub fn machine(&self, start: &Ident) -> Result<Machine, MachineError> {
        Machine::new(self.clone(), start)
    }

    pub fn index_table(&self) -> IndexTable {
        IndexTable::new(&self.table)
    }

    /// Compile the state-by-event lookup matrix.
    pub fn lut(&self) -> Lut {
        Lut::compile(&self.table, &self.index_table())
    }

    pub fn stats(&self) -> Stats {
        Stats::of(&self.table)
    }

    /// Whether two definitions share the same table allocation.
    pub fn same_table(&self, other: &Definition) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }
}
