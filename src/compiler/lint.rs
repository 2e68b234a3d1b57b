//! Whole-diagram checking that reports every malformed line.
//!
//! Compilation stops at the first error. `check` keeps going and
//! accumulates all syntax errors with stillwater's `Validation`, which is
//! friendlier when editing a large diagram.

use crate::compiler::error::SyntaxError;
use crate::compiler::parser::parse_each;
use crate::compiler::source::Source;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check every line of `source`.
///
/// # Example
///
/// ```rust
/// use arrowfsm::compiler::{lint, Source, Symbols};
/// use stillwater::validation::Validation;
///
/// let source = Source::text("A => B\nB -> C # go\nC -> A", &Symbols::new());
///
/// match lint::check(&source) {
///     Validation::Failure(errors) => assert_eq!(errors.len(), 2),
///     Validation::Success(_) => panic!("expected failures"),
/// }
/// ```
pub fn check(source: &Source) -> Validation<(), NonEmptyVec<SyntaxError>> {
    let checks: Vec<Validation<(), NonEmptyVec<SyntaxError>>> = parse_each(source)
        .map(|line| match line {
            Ok(line) => match line.event {
                Some(event) if event.label().is_empty() => {
                    Validation::fail(SyntaxError::AnonymousEvent { line: line.number })
                }
                _ => Validation::success(()),
            },
            Err(err) => Validation::fail(err),
        })
        .collect();

    Validation::all_vec(checks).map(|_| ())
}
