//! Core identifier and history types.
//!
//! - `Ident`: the closed set of things a diagram hole can hold
//! - `StateHistory`: immutable record of fired transitions

mod history;
mod ident;

pub use history::{StateHistory, StateTransition};
pub use ident::{Callable, Ident, Scalar, Value};
