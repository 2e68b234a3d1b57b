//! Errors raised while parsing a diagram and building its table.

use thiserror::Error;

/// Malformed diagram input. Line numbers are 1-based.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("line {line}: found \"{token}\" instead of \"->\", \"<-\", or \"<->\"")]
    InvalidArrow { line: usize, token: String },

    #[error("line {line}: found \"{token}\" instead of \"@\"")]
    InvalidMarker { line: usize, token: String },

    #[error("line {line}: expected `IDENT ARROW IDENT [@ IDENT]`, found {found}")]
    Malformed { line: usize, found: String },

    #[error("line {line}: event has an empty name and would shadow the default transition")]
    AnonymousEvent { line: usize },

    #[error("template has {fragments} fragments for {idents} identifiers")]
    TemplateShape { fragments: usize, idents: usize },
}

impl SyntaxError {
    /// The raw token that triggered the error, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::InvalidArrow { token, .. } | Self::InvalidMarker { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Source line of the error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidArrow { line, .. }
            | Self::InvalidMarker { line, .. }
            | Self::Malformed { line, .. }
            | Self::AnonymousEvent { line } => Some(*line),
            Self::TemplateShape { .. } => None,
        }
    }
}
