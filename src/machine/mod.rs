//! Runtime dispatcher over a compiled transition table.
//!
//! Every machine owns its current-state cell and history. The table itself
//! is shared read-only with the [`Definition`] and every other machine
//! started from it, so machines never observe each other's transitions.

mod error;

pub use error::MachineError;

use crate::compiler::{Definition, Transition, Transitions};
use crate::core::{Callable, Ident, StateHistory, StateTransition, Value};
use chrono::Utc;

/// What kind of thing is active right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Species<'a> {
    /// The current state is a constructor
    Constructor(&'a Callable),
    /// Any other state; consumers should treat the machine itself as the type
    Machine,
}

/// A running instance of a compiled diagram.
#[derive(Clone, Debug)]
pub struct Machine {
    definition: Definition,
    start: usize,
    current: usize,
    state: Ident,
    history: StateHistory,
}

impl Machine {
    /// Start a machine in `start`.
    pub fn new(definition: Definition, start: &Ident) -> Result<Self, MachineError> {
        let position = definition
            .table()
            .position(start)
            .ok_or_else(|| MachineError::UnknownState {
                state: start.to_string(),
            })?;
        Ok(Self {
            definition,
            start: position,
            current: position,
            state: start.clone(),
            history: StateHistory::new(),
        })
    }

    /// Rebuild a machine at a known table position.
    pub(crate) fn restore(
        definition: Definition,
        start: usize,
        current: usize,
        history: StateHistory,
    ) -> Option<Self> {
        let state = definition.table().state(current)?.clone();
        definition.table().state(start)?;
        Some(Self {
            definition,
            start,
            current,
            state,
            history,
        })
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn current_state(&self) -> &Ident {
        &self.state
    }

    /// Table position of the current state.
    pub fn current_position(&self) -> usize {
        self.current
    }

    /// Table position of the start state.
    pub fn start_position(&self) -> usize {
        self.start
    }

    fn transitions(&self) -> Option<&Transitions> {
        self.definition.table().transitions(self.current)
    }

    /// A state without outgoing entries cannot move anymore.
    pub fn is_terminal(&self) -> bool {
        self.transitions().is_none_or(Transitions::is_empty)
    }

    /// Entry that `trigger` would fire from the current state.
    ///
    /// Falls back to the default entry when `trigger` is not registered.
    pub fn lookup(&self, trigger: &str) -> Option<&Transition> {
        self.transitions()
            .and_then(|transitions| transitions.lookup(trigger))
            .map(|(_, transition)| transition)
    }

    /// Fire `trigger`: move to the registered next state, then run the
    /// entry's behavior with `args` and return its output.
    ///
    /// When neither `trigger` nor a default entry exists the state is left
    /// unchanged and `NoTransition` is returned.
    pub fn fire(&mut self, trigger: &str, args: &[Value]) -> Result<Value, MachineError> {
        let definition = self.definition.clone();
        let table = definition.table();

        let (key, transition) = table
            .transitions(self.current)
            .and_then(|transitions| transitions.lookup(trigger))
            .ok_or_else(|| MachineError::NoTransition {
                state: self.state.to_string(),
                trigger: trigger.to_string(),
            })?;
        let next = table
            .position(&transition.next)
            .ok_or_else(|| MachineError::UnknownState {
                state: transition.next.to_string(),
            })?;

        tracing::debug!(
            from = %self.state,
            to = %transition.next,
            trigger = key,
            "firing transition"
        );

        self.history = self.history.record(StateTransition {
            from: self.current,
            to: next,
            trigger: key.to_string(),
            timestamp: Utc::now(),
        });
        self.current = next;
        self.state = transition.next.clone();

        Ok(transition.dispatch(args))
    }

    /// Apply the machine: invoke a callable current state, or return a
    /// scalar current state as a value.
    pub fn call(&self, args: &[Value]) -> Value {
        match self.state.callable() {
            Some(callable) => callable.call(args),
            None => self.state.to_value(),
        }
    }

    /// Construct the current state, if it is a constructor.
    pub fn construct(&self, args: &[Value]) -> Option<Value> {
        match &self.state {
            Ident::Constructor(factory) => Some(factory.call(args)),
            _ => None,
        }
    }

    pub fn species(&self) -> Species<'_> {
        match &self.state {
            Ident::Constructor(factory) => Species::Constructor(factory),
            _ => Species::Machine,
        }
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// States visited so far, starting with the first one left.
    pub fn path(&self) -> Vec<&Ident> {
        let table = self.definition.table();
        self.history
            .get_path()
            .into_iter()
            .filter_map(|position| table.state(position))
            .collect()
    }
}
