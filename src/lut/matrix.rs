//! State-by-event lookup matrix.

use crate::compiler::TransitionTable;
use crate::lut::index::IndexTable;
use serde::{Deserialize, Serialize};

/// Rectangular matrix: row = state index, column = event index,
/// cell = next-state index. `None` means no transition.
///
/// Default (trigger-less) entries are not part of the matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lut {
    rows: Vec<Vec<Option<usize>>>,
}

impl Lut {
    /// Compile the matrix for `table` using the indices of `index`.
    pub fn compile(table: &TransitionTable, index: &IndexTable) -> Self {
        let width = index.event_count();
        let mut rows = vec![vec![None; width]; index.state_count()];
        for (state, transitions) in table.iter() {
            let Some(row) = index.state_index(state).and_then(|i| rows.get_mut(i)) else {
                continue;
            };
            for (_, transition) in transitions.named() {
                let event = transition.event.as_ref().and_then(|e| index.event_index(e));
                let next = index.state_index(&transition.next);
                if let (Some(event), Some(next)) = (event, next) {
                    row[event] = Some(next);
                }
            }
        }
        Self { rows }
    }

    /// Build a matrix from raw rows.
    pub fn from_rows(rows: Vec<Vec<Option<usize>>>) -> Self {
        Self { rows }
    }

    /// Next state for `event` at `state`.
    pub fn get(&self, state: usize, event: usize) -> Option<usize> {
        self.rows.get(state)?.get(event).copied().flatten()
    }

    pub fn row(&self, state: usize) -> Option<&[Option<usize>]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<Option<usize>>] {
        &self.rows
    }

    /// Number of rows (states).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns (events).
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{Definition, Source, Symbols};
    use crate::core::Ident;

    fn definition(text: &str) -> Definition {
        Definition::compile(&Source::text(text, &Symbols::new())).unwrap()
    }

    #[test]
    fn default_transitions_are_not_placed() {
        let lut = definition("A -> B\nB -> A @ go").lut();
        let expected: Vec<Vec<Option<usize>>> = vec![vec![None], vec![Some(0)]];

        assert_eq!(lut.rows(), expected.as_slice());
    }

    #[test]
    fn lookup_follows_index_table() {
        let definition = definition("A -> B @ C");
        let index = definition.index_table();
        let lut = definition.lut();

        let state = index.state_index(&Ident::text("A")).unwrap();
        let event = index.event_index(&Ident::text("C")).unwrap();

        assert_eq!(lut.get(state, event), index.state_index(&Ident::text("B")));
    }

    #[test]
    fn terminal_rows_are_empty() {
        let lut = definition("A -> B @ x\nA -> C @ y").lut();

        assert_eq!(lut.width(), 2);
        assert_eq!(lut.row(0), Some(&[Some(1), Some(2)][..]));
        assert!(lut.row(1).unwrap().iter().all(Option::is_none));
        assert!(lut.row(2).unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let lut = definition("A -> B @ x").lut();

        assert_eq!(lut.get(9, 0), None);
        assert_eq!(lut.get(0, 9), None);
    }
}
