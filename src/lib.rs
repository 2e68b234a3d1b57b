//! Arrowfsm: compile arrow diagrams into state machines and lookup tables.
//!
//! A diagram is a handful of lines such as `A -> B`, `A <- B` or
//! `A <-> B`, each optionally gated by an event (`@ event`). Compiling it
//! produces a [`Definition`](compiler::Definition) that can
//!
//! - start any number of independent [`Machine`](machine::Machine)s,
//! - assign dense indices to states and events ([`IndexTable`](lut::IndexTable)),
//! - compile a state-by-event integer matrix ([`Lut`](lut::Lut)),
//! - be flattened into a `u32` buffer with a source map ([`codec`]).
//!
//! # Example
//!
//! ```rust
//! use arrowfsm::codec::{decode, encode, CodecConfig};
//! use arrowfsm::compiler::{Definition, Source, Symbols};
//! use arrowfsm::core::{Ident, Value};
//!
//! let open = Ident::behavior("open", |_| Value::from("creak"));
//! let symbols = Symbols::new().with(open);
//!
//! let door = Definition::compile(&Source::text(
//!     "Closed -> Opened @ open\nOpened -> Closed @ shut",
//!     &symbols,
//! ))
//! .unwrap();
//!
//! let mut machine = door.machine(&Ident::text("Closed")).unwrap();
//! assert_eq!(machine.fire("open", &[]).unwrap(), Value::from("creak"));
//! assert_eq!(machine.current_state(), &Ident::text("Opened"));
//!
//! let encoded = encode(&door, &CodecConfig::default()).unwrap();
//! assert_eq!(decode(&encoded).unwrap(), door.lut());
//! ```

pub mod checkpoint;
pub mod codec;
pub mod compiler;
pub mod core;
pub mod lut;
pub mod machine;

// Re-export commonly used types
pub use crate::compiler::{Definition, Source, Symbols, SyntaxError};
pub use crate::core::{Callable, Ident, Value};
pub use crate::machine::{Machine, MachineError};
