//! Dense integer indices for states and events.

use crate::compiler::TransitionTable;
use crate::core::Ident;
use std::collections::HashMap;

/// Zero-based indices assigned in first-encounter order, plus inverses.
///
/// Identity follows [`Ident`] equality: equal scalars share an index,
/// distinct callables never do, whatever their names.
///
/// # Example
///
/// ```rust
/// use arrowfsm::compiler::{Definition, Source, Symbols};
/// use arrowfsm::core::Ident;
///
/// let definition = Definition::compile(&Source::text("A -> B @ C", &Symbols::new())).unwrap();
/// let index = definition.index_table();
///
/// assert_eq!(index.state_index(&Ident::text("A")), Some(0));
/// assert_eq!(index.event_index(&Ident::text("C")), Some(0));
/// assert_eq!(index.event(0), Some(&Ident::text("C")));
/// assert_eq!(index.state(1), Some(&Ident::text("B")));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexTable {
    states: HashMap<Ident, usize>,
    events: HashMap<Ident, usize>,
    inverse_states: Vec<Ident>,
    inverse_events: Vec<Ident>,
}

impl IndexTable {
    /// Walk the table once, indexing states and named events.
    pub fn new(table: &TransitionTable) -> Self {
        let mut index = Self::default();
        for (state, transitions) in table.iter() {
            assign(&mut index.states, &mut index.inverse_states, state);
            for (_, transition) in transitions.named() {
                if let Some(event) = &transition.event {
                    assign(&mut index.events, &mut index.inverse_events, event);
                }
            }
        }
        index
    }

    pub fn state_index(&self, state: &Ident) -> Option<usize> {
        self.states.get(state).copied()
    }

    pub fn event_index(&self, event: &Ident) -> Option<usize> {
        self.events.get(event).copied()
    }

    /// State at `index`.
    pub fn state(&self, index: usize) -> Option<&Ident> {
        self.inverse_states.get(index)
    }

    /// Event at `index`.
    pub fn event(&self, index: usize) -> Option<&Ident> {
        self.inverse_events.get(index)
    }

    /// States in index order.
    pub fn states(&self) -> &[Ident] {
        &self.inverse_states
    }

    /// Events in index order.
    pub fn events(&self) -> &[Ident] {
        &self.inverse_events
    }

    pub fn state_count(&self) -> usize {
        self.inverse_states.len()
    }

    pub fn event_count(&self) -> usize {
        self.inverse_events.len()
    }
}

fn assign(forward: &mut HashMap<Ident, usize>, inverse: &mut Vec<Ident>, ident: &Ident) {
    if !forward.contains_key(ident) {
        forward.insert(ident.clone(), inverse.len());
        inverse.push(ident.clone());
    }
}
