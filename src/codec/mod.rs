//! Flat binary encoding of lookup matrices.
//!
//! `encode` sorts matrix rows by ascending number of transitions, flattens
//! them into one `u32` buffer and stores every next-state index shifted by
//! one, so `0` marks "no transition". The [`SourceMap`] keeps readable
//! names and the row permutation needed to restore the original matrix.

pub mod config;
pub mod error;

pub use config::{CodecConfig, Layout};
pub use error::CodecError;

use crate::compiler::Definition;
use crate::core::Ident;
use crate::lut::{IndexTable, Lut};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Whether a symbol names a state or an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    State,
    Event,
}

/// Distinct identifiers sharing one display name.
///
/// Indices stay distinct; only the readable labels collide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameConflict {
    pub kind: SymbolKind,
    pub name: String,
    pub indices: Vec<usize>,
}

/// Metadata needed to read an encoded buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMap {
    pub layout: Layout,
    /// State index -> readable name
    pub state_names: Vec<String>,
    /// Event index -> readable name
    pub event_names: Vec<String>,
    /// Original row (state index) -> position in the sorted buffer
    pub row_permutation: Vec<usize>,
    pub conflicts: Vec<NameConflict>,
}

impl SourceMap {
    pub fn state_name(&self, index: usize) -> Option<&str> {
        self.state_names.get(index).map(String::as_str)
    }

    pub fn event_name(&self, index: usize) -> Option<&str> {
        self.event_names.get(index).map(String::as_str)
    }
}

/// Encoded lookup matrix plus its source map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedTable {
    pub buffer: Vec<u32>,
    pub source_map: SourceMap,
}

impl EncodedTable {
    /// Serialize to bytes with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(self).map_err(|e| CodecError::SerializationFailed(e.to_string()))
    }

    /// Deserialize bytes produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::DeserializationFailed(e.to_string()))
    }
}

/// Encode the lookup matrix of a compiled diagram.
///
/// # Example
///
/// ```rust
/// use arrowfsm::codec::{decode, encode, CodecConfig};
/// use arrowfsm::compiler::{Definition, Source, Symbols};
///
/// let definition = Definition::compile(&Source::text(
///     "A -> B\nB -> A @ go",
///     &Symbols::new(),
/// ))
/// .unwrap();
///
/// let encoded = encode(&definition, &CodecConfig::default()).unwrap();
/// assert_eq!(encoded.buffer, vec![0, 1]);
/// assert_eq!(decode(&encoded).unwrap(), definition.lut());
/// ```
pub fn encode(definition: &Definition, config: &CodecConfig) -> Result<EncodedTable, CodecError> {
    let index = definition.index_table();
    let lut = Lut::compile(definition.table(), &index);
    encode_lut(&lut, &index, config)
}

/// Encode an already compiled matrix.
pub fn encode_lut(
    lut: &Lut,
    index: &IndexTable,
    config: &CodecConfig,
) -> Result<EncodedTable, CodecError> {
    if config.layout == Layout::Strided {
        return Err(CodecError::Unimplemented("stride-packed layout"));
    }

    let rows = lut.rows();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by_key(|&row| rows[row].iter().flatten().count());

    let mut row_permutation = vec![0; rows.len()];
    for (position, &row) in order.iter().enumerate() {
        row_permutation[row] = position;
    }

    let mut buffer = Vec::with_capacity(rows.len() * lut.width());
    for &row in &order {
        for cell in &rows[row] {
            buffer.push(match *cell {
                Some(next) => u32::try_from(next + 1).map_err(|_| CodecError::Overflow(next))?,
                None => 0,
            });
        }
    }

    let (state_names, mut conflicts) = names(index.states(), SymbolKind::State, config);
    let (event_names, event_conflicts) = names(index.events(), SymbolKind::Event, config);
    conflicts.extend(event_conflicts);

    tracing::debug!(
        states = state_names.len(),
        events = event_names.len(),
        cells = buffer.len(),
        "encoded lookup table"
    );

    Ok(EncodedTable {
        buffer,
        source_map: SourceMap {
            layout: config.layout,
            state_names,
            event_names,
            row_permutation,
            conflicts,
        },
    })
}

/// Restore the lookup matrix from an encoded table.
///
/// The result equals [`Lut::compile`] on the table that was encoded.
pub fn decode(encoded: &EncodedTable) -> Result<Lut, CodecError> {
    let map = &encoded.source_map;
    if map.layout == Layout::Strided {
        return Err(CodecError::Unimplemented("stride-packed layout"));
    }

    let states = map.state_names.len();
    let width = map.event_names.len();
    let expected = states * width;
    if encoded.buffer.len() != expected {
        return Err(CodecError::ShapeMismatch {
            expected,
            found: encoded.buffer.len(),
        });
    }
    validate_permutation(&map.row_permutation, states)?;

    let mut rows = Vec::with_capacity(states);
    for &position in &map.row_permutation {
        let start = position * width;
        let mut row = Vec::with_capacity(width);
        for (offset, &value) in encoded.buffer[start..start + width].iter().enumerate() {
            row.push(match value {
                0 => None,
                value => {
                    let next = (value - 1) as usize;
                    if next >= states {
                        return Err(CodecError::CellOutOfRange {
                            cell: start + offset,
                            value,
                            states,
                        });
                    }
                    Some(next)
                }
            });
        }
        rows.push(row);
    }
    Ok(Lut::from_rows(rows))
}

fn validate_permutation(permutation: &[usize], rows: usize) -> Result<(), CodecError> {
    if permutation.len() != rows {
        return Err(CodecError::InvalidPermutation(format!(
            "{} entries for {rows} rows",
            permutation.len()
        )));
    }
    let mut seen = vec![false; rows];
    for &position in permutation {
        match seen.get_mut(position) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(CodecError::InvalidPermutation(format!(
                    "position {position} appears twice"
                )))
            }
            None => {
                return Err(CodecError::InvalidPermutation(format!(
                    "position {position} is out of range"
                )))
            }
        }
    }
    Ok(())
}

fn names(
    idents: &[Ident],
    kind: SymbolKind,
    config: &CodecConfig,
) -> (Vec<String>, Vec<NameConflict>) {
    let names: Vec<String> = idents
        .iter()
        .map(|ident| {
            let label = ident.label();
            if label.is_empty() {
                random_token(config.name_token_len)
            } else {
                label
            }
        })
        .collect();

    let conflicts: Vec<NameConflict> = {
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            match slots.get(name.as_str()) {
                Some(&slot) => groups[slot].1.push(i),
                None => {
                    slots.insert(name.as_str(), groups.len());
                    groups.push((name.as_str(), vec![i]));
                }
            }
        }

        groups
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(name, indices)| {
                tracing::warn!(?kind, label = name, ?indices, "distinct identifiers share a name");
                NameConflict {
                    kind,
                    name: name.to_string(),
                    indices,
                }
            })
            .collect()
    };

    (names, conflicts)
}

fn random_token(len: usize) -> String {
    let token = Uuid::new_v4().simple().to_string();
    token[..len.clamp(1, token.len())].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{Source, Symbols};
    use crate::core::{Callable, Value};

    fn definition(text: &str) -> Definition {
        Definition::compile(&Source::text(text, &Symbols::new())).unwrap()
    }

    #[test]
    fn rows_are_sorted_by_transition_count() {
        // A has two transitions, B one, C none
        let encoded = encode(
            &definition("A -> B @ x\nA -> C @ y\nB -> A @ x"),
            &CodecConfig::default(),
        )
        .unwrap();

        assert_eq!(encoded.source_map.row_permutation, vec![2, 1, 0]);
        assert_eq!(encoded.buffer, vec![0, 0, 1, 0, 2, 3]);
    }

    #[test]
    fn ties_keep_original_order() {
        let definition = definition("A -> B @ x\nB -> A @ x");
        let encoded = encode(&definition, &CodecConfig::default()).unwrap();

        assert_eq!(encoded.source_map.row_permutation, vec![0, 1]);
        assert_eq!(encoded.buffer, vec![2, 1]);
    }

    #[test]
    fn decode_restores_compiled_lut() {
        let definition = definition("A -> B @ x\nA -> C @ y\nB -> A @ x\nC <-> D @ z\nD -> E");
        let encoded = encode(&definition, &CodecConfig::default()).unwrap();

        assert_eq!(decode(&encoded).unwrap(), definition.lut());
    }

    #[test]
    fn source_map_names_states_and_events() {
        let encoded = encode(&definition("A -> B @ go"), &CodecConfig::default()).unwrap();

        assert_eq!(encoded.source_map.state_name(0), Some("A"));
        assert_eq!(encoded.source_map.state_name(1), Some("B"));
        assert_eq!(encoded.source_map.event_name(0), Some("go"));
        assert!(encoded.source_map.conflicts.is_empty());
    }

    #[test]
    fn anonymous_identifiers_get_random_tokens() {
        let anonymous = Ident::Behavior(Callable::anonymous(|_| Value::Null));
        let source = Source::new()
            .ident(anonymous)
            .fragment("->")
            .ident("B")
            .fragment("@")
            .ident("go");
        let config = CodecConfig::new().name_token_len(6);

        let encoded = encode(&Definition::compile(&source).unwrap(), &config).unwrap();
        let name = encoded.source_map.state_name(0).unwrap();

        assert_eq!(name.len(), 6);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn name_collisions_are_recorded_not_fatal() {
        let first = Ident::behavior("Idle", |_| Value::Null);
        let second = Ident::behavior("Idle", |_| Value::Null);
        let source = Source::new()
            .ident(first)
            .fragment("->")
            .ident(second)
            .fragment("@")
            .ident("go");

        let definition = Definition::compile(&source).unwrap();
        let encoded = encode(&definition, &CodecConfig::default()).unwrap();

        assert_eq!(
            encoded.source_map.conflicts,
            vec![NameConflict {
                kind: SymbolKind::State,
                name: "Idle".to_string(),
                indices: vec![0, 1],
            }]
        );
        assert_eq!(encoded.buffer, vec![0, 2]);
    }

    #[test]
    fn strided_layout_is_unimplemented() {
        let config = CodecConfig::new().layout(Layout::Strided);
        let result = encode(&definition("A -> B @ go"), &config);

        assert!(matches!(result, Err(CodecError::Unimplemented(_))));

        let mut encoded = encode(&definition("A -> B @ go"), &CodecConfig::default()).unwrap();
        encoded.source_map.layout = Layout::Strided;
        assert!(matches!(decode(&encoded), Err(CodecError::Unimplemented(_))));
    }

    #[test]
    fn decode_rejects_truncated_buffer() {
        let mut encoded = encode(&definition("A -> B @ go"), &CodecConfig::default()).unwrap();
        encoded.buffer.pop();

        assert!(matches!(
            decode(&encoded),
            Err(CodecError::ShapeMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn decode_rejects_out_of_range_cells() {
        let mut encoded = encode(&definition("A -> B @ go"), &CodecConfig::default()).unwrap();
        encoded.buffer[1] = 9;

        assert!(matches!(
            decode(&encoded),
            Err(CodecError::CellOutOfRange { value: 9, states: 2, .. })
        ));
    }

    #[test]
    fn decode_rejects_bad_permutation() {
        let mut encoded = encode(&definition("A -> B @ go"), &CodecConfig::default()).unwrap();
        encoded.source_map.row_permutation = vec![1, 1];

        assert!(matches!(decode(&encoded), Err(CodecError::InvalidPermutation(_))));
    }

    #[test]
    fn bytes_roundtrip() {
        let encoded = encode(&definition("A -> B @ go\nB -> A"), &CodecConfig::default()).unwrap();
        let bytes = encoded.to_bytes().unwrap();

        assert_eq!(EncodedTable::from_bytes(&bytes).unwrap(), encoded);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = EncodedTable::from_bytes(&[0xff, 0x01]);

        assert!(matches!(result, Err(CodecError::DeserializationFailed(_))));
    }
}
