//! Transition table: state -> trigger dictionary.

use crate::compiler::error::SyntaxError;
use crate::compiler::parser::Line;
use crate::core::{Ident, Value};
use std::collections::HashMap;

/// Trigger key of the default (no-event) entry.
pub const DEFAULT_TRIGGER: &str = "";

/// How an entry behaves when fired. Decided once, at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Move to `next` and yield its scalar value.
    Label,
    /// Move to `next`, run `next` if callable, then pipe into `event` if callable.
    Compose,
}

/// One entry of a trigger dictionary.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub next: Ident,
    /// Event that gated this entry; `None` for the default entry
    pub event: Option<Ident>,
    pub action: Action,
}

impl Transition {
    fn default_to(next: Ident) -> Self {
        let action = if next.is_callable() {
            Action::Compose
        } else {
            Action::Label
        };
        Self {
            next,
            event: None,
            action,
        }
    }

    /// Run the entry's behavior.
    ///
    /// The caller is responsible for moving the current state to `next`.
    pub fn dispatch(&self, args: &[Value]) -> Value {
        match self.action {
            Action::Label => self.next.to_value(),
            Action::Compose => {
                let result = self
                    .next
                    .callable()
                    .map_or(Value::Null, |next| next.call(args));
                let Some(event) = self.event.as_ref().and_then(Ident::callable) else {
                    return result;
                };
                let output = match &result {
                    Value::Array(items) => event.call(items),
                    _ => event.call(args),
                };
                if output.is_null() {
                    result
                } else {
                    output
                }
            }
        }
    }
}

/// Ordered trigger dictionary of a single state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transitions {
    entries: Vec<(String, Transition)>,
}

impl Transitions {
    pub fn get(&self, trigger: &str) -> Option<&Transition> {
        self.entries
            .iter()
            .find(|(key, _)| key == trigger)
            .map(|(_, transition)| transition)
    }

    /// Entry for `trigger`, falling back to the default entry.
    pub fn lookup(&self, trigger: &str) -> Option<(&str, &Transition)> {
        self.entries
            .iter()
            .find(|(key, _)| key == trigger)
            .or_else(|| self.entries.iter().find(|(key, _)| key == DEFAULT_TRIGGER))
            .map(|(key, transition)| (key.as_str(), transition))
    }

    pub fn default_entry(&self) -> Option<&Transition> {
        self.get(DEFAULT_TRIGGER)
    }

    /// Replace an existing key in place or append a new one.
    fn insert(&mut self, trigger: String, transition: Transition) {
        match self.entries.iter_mut().find(|(key, _)| *key == trigger) {
            Some((_, slot)) => *slot = transition,
            None => self.entries.push((trigger, transition)),
        }
    }

    fn remove(&mut self, trigger: &str) {
        self.entries.retain(|(key, _)| key != trigger);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Transition)> {
        self.entries
            .iter()
            .map(|(key, transition)| (key.as_str(), transition))
    }

    /// Entries keyed by a named trigger, skipping the default one.
    pub fn named(&self) -> impl Iterator<Item = (&str, &Transition)> {
        self.iter().filter(|(key, _)| *key != DEFAULT_TRIGGER)
    }

    /// Out-degree of the state.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A state without entries is terminal.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// States in first-encounter order, each with its trigger dictionary.
///
/// Every `next` target is also a key of the table, possibly with an empty
/// dictionary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionTable {
    states: Vec<(Ident, Transitions)>,
    positions: HashMap<Ident, usize>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from parsed lines.
    pub fn build(lines: &[Line]) -> Result<Self, SyntaxError> {
        let mut table = Self::new();
        for line in lines {
            table.add_line(line)?;
        }
        Ok(table)
    }

    fn add_line(&mut self, line: &Line) -> Result<(), SyntaxError> {
        let mut sources = Vec::with_capacity(2);
        if line.arrow.into {
            sources.push((&line.left, &line.right));
        }
        if line.arrow.from {
            sources.push((&line.right, &line.left));
        }

        for (current, next) in &sources {
            self.register(current);
            self.register(next);
            self.entry(current)
                .insert(DEFAULT_TRIGGER.to_string(), Transition::default_to((*next).clone()));
        }

        let Some(event) = &line.event else {
            return Ok(());
        };
        let trigger = event.label();
        if trigger.is_empty() {
            return Err(SyntaxError::AnonymousEvent { line: line.number });
        }

        for (current, next) in sources {
            let action = if next.is_callable() || event.is_callable() {
                Action::Compose
            } else {
                Action::Label
            };
            let transitions = self.entry(current);
            transitions.remove(DEFAULT_TRIGGER);
            transitions.insert(
                trigger.clone(),
                Transition {
                    next: next.clone(),
                    event: Some(event.clone()),
                    action,
                },
            );
        }
        Ok(())
    }

    fn register(&mut self, state: &Ident) -> usize {
        if let Some(&position) = self.positions.get(state) {
            return position;
        }
        let position = self.states.len();
        self.states.push((state.clone(), Transitions::default()));
        self.positions.insert(state.clone(), position);
        position
    }

    fn entry(&mut self, state: &Ident) -> &mut Transitions {
        let position = self.register(state);
        &mut self.states[position].1
    }

    pub fn get(&self, state: &Ident) -> Option<&Transitions> {
        self.position(state).map(|position| &self.states[position].1)
    }

    /// Table position of a state.
    pub fn position(&self, state: &Ident) -> Option<usize> {
        self.positions.get(state).copied()
    }

    pub fn state(&self, position: usize) -> Option<&Ident> {
        self.states.get(position).map(|(state, _)| state)
    }

    pub fn transitions(&self, position: usize) -> Option<&Transitions> {
        self.states.get(position).map(|(_, transitions)| transitions)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ident, &Transitions)> {
        self.states
            .iter()
            .map(|(state, transitions)| (state, transitions))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
