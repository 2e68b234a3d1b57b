//! Diagram sources.
//!
//! A diagram is literal text with identifier holes. Sources can be written
//! as a tagged template (fragments plus positional identifiers), built
//! piece by piece, or parsed from plain text with a symbol registry.
//! Every form lowers to the same token stream.

use crate::compiler::error::SyntaxError;
use crate::core::Ident;
use std::collections::HashMap;

/// One lexical unit of a diagram.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Identifier filling a hole
    Hole(Ident),
    /// Literal text such as an arrow or the `@` marker
    Word(String),
    /// Line boundary
    Newline,
}

/// Registry resolving words of a plain-text diagram to identifiers.
///
/// # Example
///
/// ```rust
/// use arrowfsm::compiler::Symbols;
/// use arrowfsm::core::{Ident, Value};
///
/// let go = Ident::behavior("go", |_| Value::Null);
/// let symbols = Symbols::new().with(go.clone());
///
/// assert_eq!(symbols.get("go"), Some(&go));
/// assert_eq!(symbols.resolve("idle"), Ident::text("idle"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Symbols {
    names: HashMap<String, Ident>,
}

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identifier under its label.
    pub fn with(mut self, ident: Ident) -> Self {
        self.insert(ident.label(), ident);
        self
    }

    /// Register an identifier under an explicit name.
    pub fn insert(&mut self, name: impl Into<String>, ident: Ident) {
        self.names.insert(name.into(), ident);
    }

    pub fn get(&self, name: &str) -> Option<&Ident> {
        self.names.get(name)
    }

    /// Resolve a word that sits in an identifier position.
    ///
    /// Registered names win; otherwise integers become numeric scalars and
    /// anything else a text scalar.
    pub fn resolve(&self, word: &str) -> Ident {
        if let Some(ident) = self.get(word) {
            return ident.clone();
        }
        match word.parse::<i64>() {
            Ok(n) => Ident::number(n),
            Err(_) => Ident::text(word),
        }
    }
}

impl FromIterator<Ident> for Symbols {
    fn from_iter<T: IntoIterator<Item = Ident>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// A diagram ready to be parsed.
#[derive(Clone, Debug, Default)]
pub struct Source {
    tokens: Vec<Token>,
}

impl Source {
    /// Start an empty source for piecewise construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source the way a tagged template would be laid out:
    /// `fragments[0] idents[0] fragments[1] ... idents[n-1] fragments[n]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use arrowfsm::compiler::Source;
    /// use arrowfsm::core::Ident;
    ///
    /// let source = Source::template(
    ///     &["", " -> ", "\n", " -> ", " @ ", "\n"],
    ///     vec![
    ///         Ident::text("A"),
    ///         Ident::text("B"),
    ///         Ident::text("B"),
    ///         Ident::text("A"),
    ///         Ident::text("go"),
    ///     ],
    /// )
    /// .unwrap();
    /// assert!(!source.tokens().is_empty());
    /// ```
    pub fn template<S: AsRef<str>>(
        fragments: &[S],
        idents: Vec<Ident>,
    ) -> Result<Self, SyntaxError> {
        if fragments.len() != idents.len() + 1 {
            return Err(SyntaxError::TemplateShape {
                fragments: fragments.len(),
                idents: idents.len(),
            });
        }

        let mut source = Self::new();
        let mut idents = idents.into_iter();
        for (i, fragment) in fragments.iter().enumerate() {
            source = source.fragment(fragment.as_ref());
            if i + 1 < fragments.len() {
                if let Some(ident) = idents.next() {
                    source = source.ident(ident);
                }
            }
        }
        Ok(source)
    }

    /// Parse a plain-text diagram, resolving identifier words through `symbols`.
    ///
    /// Words without any alphanumeric character are kept as literal tokens
    /// (arrows, markers, typos like `=>`); every other word is an identifier.
    pub fn text(text: &str, symbols: &Symbols) -> Self {
        let mut tokens = Vec::new();
        for line in text.lines() {
            for word in line.split_whitespace() {
                if symbols.get(word).is_none() && !word.chars().any(char::is_alphanumeric) {
                    tokens.push(Token::Word(word.to_string()));
                } else {
                    tokens.push(Token::Hole(symbols.resolve(word)));
                }
            }
            tokens.push(Token::Newline);
        }
        Self { tokens }
    }

    /// Append a literal fragment.
    ///
    /// Blank fragments separate lines; otherwise each line-break-delimited
    /// piece is trimmed and kept as one token.
    pub fn fragment(mut self, text: &str) -> Self {
        if text.trim().is_empty() {
            self.tokens.push(Token::Newline);
            return self;
        }
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.tokens.push(Token::Newline);
            }
            let piece = piece.trim();
            if !piece.is_empty() {
                self.tokens.push(Token::Word(piece.to_string()));
            }
        }
        self
    }

    /// Append an identifier hole.
    pub fn ident(mut self, ident: impl Into<Ident>) -> Self {
        self.tokens.push(Token::Hole(ident.into()));
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    fn words(source: &Source) -> Vec<String> {
        source
            .tokens()
            .iter()
            .map(|token| match token {
                Token::Hole(ident) => format!("<{ident}>"),
                Token::Word(word) => word.clone(),
                Token::Newline => "\\n".to_string(),
            })
            .collect()
    }

    #[test]
    fn template_interleaves_fragments_and_holes() {
        let source = Source::template(
            &["", " -> ", " @ ", "\n"],
            vec!["A".into(), "B".into(), "go".into()],
        )
        .unwrap();

        assert_eq!(words(&source), vec!["\\n", "<A>", "->", "<B>", "@", "<go>", "\\n"]);
    }

    #[test]
    fn template_rejects_wrong_shape() {
        let result = Source::template(&["", " -> "], vec!["A".into(), "B".into()]);

        assert_eq!(
            result.unwrap_err(),
            SyntaxError::TemplateShape {
                fragments: 2,
                idents: 2
            }
        );
    }

    #[test]
    fn fragment_splits_on_line_breaks() {
        let source = Source::new().fragment(" @ \n  -> ");

        assert_eq!(words(&source), vec!["@", "\\n", "->"]);
    }

    #[test]
    fn text_resolves_registered_symbols() {
        let go = Ident::behavior("go", |_| Value::Null);
        let symbols = Symbols::new().with(go.clone());
        let source = Source::text("A -> B @ go", &symbols);

        assert_eq!(source.tokens()[4], Token::Hole(go));
    }

    #[test]
    fn text_keeps_operator_words_literal() {
        let source = Source::text("1 => 2", &Symbols::new());

        assert_eq!(
            source.tokens(),
            &[
                Token::Hole(Ident::number(1)),
                Token::Word("=>".to_string()),
                Token::Hole(Ident::number(2)),
                Token::Newline,
            ]
        );
    }
}
