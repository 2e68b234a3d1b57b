//! Read-only summary of a transition table.

use crate::compiler::TransitionTable;
use crate::core::Ident;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Derived counts describing a transition table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Distinct named events
    pub events: usize,
    /// Whether any state keeps a default (trigger-less) entry
    pub has_default: bool,
    pub states: usize,
    /// States with no outgoing entries
    pub terminal_states: usize,
    pub max_out_degree: usize,
    pub min_out_degree: usize,
}

impl Stats {
    pub fn of(table: &TransitionTable) -> Self {
        let mut events: HashSet<&Ident> = HashSet::new();
        let mut stats = Self {
            states: table.len(),
            min_out_degree: if table.is_empty() { 0 } else { usize::MAX },
            ..Self::default()
        };

        for (_, transitions) in table.iter() {
            let degree = transitions.len();
            stats.max_out_degree = stats.max_out_degree.max(degree);
            stats.min_out_degree = stats.min_out_degree.min(degree);
            if transitions.is_empty() {
                stats.terminal_states += 1;
            }
            if transitions.default_entry().is_some() {
                stats.has_default = true;
            }
            events.extend(
                transitions
                    .named()
                    .filter_map(|(_, transition)| transition.event.as_ref()),
            );
        }

        stats.events = events.len();
        stats
    }
}
