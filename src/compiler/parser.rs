//! Line grammar: `IDENT ARROW IDENT [@ IDENT]`.

use crate::compiler::error::SyntaxError;
use crate::compiler::source::{Source, Token};
use crate::core::Ident;

/// Direction(s) encoded by an arrow token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arrow {
    /// Token ends with `->`: left state moves to right state
    pub into: bool,
    /// Token starts with `<-`: right state moves to left state
    pub from: bool,
}

impl Arrow {
    /// Classify an arrow token, `None` when it is neither form.
    ///
    /// `<->` satisfies both forms.
    pub fn parse(token: &str) -> Option<Self> {
        let arrow = Self {
            into: token.ends_with("->"),
            from: token.starts_with("<-"),
        };
        (arrow.into || arrow.from).then_some(arrow)
    }

    pub fn is_bidirectional(&self) -> bool {
        self.into && self.from
    }
}

/// One parsed diagram line.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// 1-based line number in the source
    pub number: usize,
    pub arrow: Arrow,
    pub left: Ident,
    pub right: Ident,
    /// Event gating the transition, when the line carries `@ event`
    pub event: Option<Ident>,
}

/// Parse every line, stopping at the first malformed one.
pub fn parse(source: &Source) -> Result<Vec<Line>, SyntaxError> {
    parse_each(source).collect()
}

/// Parse lines lazily, yielding one result per non-blank line.
pub fn parse_each(source: &Source) -> impl Iterator<Item = Result<Line, SyntaxError>> + '_ {
    source
        .tokens()
        .split(|token| matches!(token, Token::Newline))
        .enumerate()
        .filter(|(_, tokens)| !tokens.is_empty())
        .map(|(i, tokens)| parse_line(i + 1, tokens))
}

fn parse_line(number: usize, tokens: &[Token]) -> Result<Line, SyntaxError> {
    let (left, arrow, right, rest) = match tokens {
        [Token::Hole(left), Token::Word(arrow), Token::Hole(right), rest @ ..] => {
            (left, arrow, right, rest)
        }
        _ => return Err(malformed(number, tokens)),
    };

    let arrow = Arrow::parse(arrow).ok_or_else(|| SyntaxError::InvalidArrow {
        line: number,
        token: arrow.clone(),
    })?;

    let event = match rest {
        [] => None,
        [Token::Word(marker), Token::Hole(event)] => {
            if marker != "@" {
                return Err(SyntaxError::InvalidMarker {
                    line: number,
                    token: marker.clone(),
                });
            }
            Some(event.clone())
        }
        // A wordy marker such as `at` is read as an identifier.
        [Token::Hole(marker), Token::Hole(_)] => {
            return Err(SyntaxError::InvalidMarker {
                line: number,
                token: marker.label(),
            });
        }
        _ => return Err(malformed(number, tokens)),
    };

    Ok(Line {
        number,
        arrow,
        left: left.clone(),
        right: right.clone(),
        event,
    })
}

fn malformed(line: usize, tokens: &[Token]) -> SyntaxError {
    let found = tokens
        .iter()
        .map(|token| match token {
            Token::Hole(ident) => format!("${{{ident}}}"),
            Token::Word(word) => format!("\"{word}\""),
            Token::Newline => String::new(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    SyntaxError::Malformed { line, found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::source::Symbols;

    fn lines(text: &str) -> Result<Vec<Line>, SyntaxError> {
        parse(&Source::text(text, &Symbols::new()))
    }

    #[test]
    fn arrow_forms_are_classified() {
        assert_eq!(Arrow::parse("->"), Some(Arrow { into: true, from: false }));
        assert_eq!(Arrow::parse("<-"), Some(Arrow { into: false, from: true }));
        assert!(Arrow::parse("<->").unwrap().is_bidirectional());
        assert!(Arrow::parse("-->").unwrap().into);
        assert_eq!(Arrow::parse("=>"), None);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let parsed = lines("\n\n  A -> B  \n\n B <- C @ go \n").unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].number, 3);
        assert_eq!(parsed[1].number, 5);
        assert_eq!(parsed[1].event, Some(Ident::text("go")));
    }

    #[test]
    fn unsupported_arrow_is_reported() {
        let err = lines("A => B\n").unwrap_err();

        assert_eq!(
            err,
            SyntaxError::InvalidArrow {
                line: 1,
                token: "=>".to_string()
            }
        );
        assert_eq!(err.token(), Some("=>"));
    }

    #[test]
    fn wrong_marker_is_reported() {
        let err = lines("A -> B # go").unwrap_err();

        assert_eq!(
            err,
            SyntaxError::InvalidMarker {
                line: 1,
                token: "#".to_string()
            }
        );
    }

    #[test]
    fn wordy_marker_names_the_token() {
        let err = lines("A -> B at go").unwrap_err();

        assert_eq!(err.token(), Some("at"));
        assert_eq!(
            err,
            SyntaxError::InvalidMarker {
                line: 1,
                token: "at".to_string()
            }
        );
    }

    #[test]
    fn dangling_marker_is_malformed() {
        let err = lines("A -> B @").unwrap_err();

        assert!(matches!(err, SyntaxError::Malformed { line: 1, .. }));
    }

    #[test]
    fn missing_target_is_malformed() {
        let err = lines("A ->").unwrap_err();

        assert!(matches!(err, SyntaxError::Malformed { line: 1, .. }));
    }

    #[test]
    fn parse_stops_at_first_error() {
        let err = lines("A -> B\nB => C\nC ~> D").unwrap_err();

        assert_eq!(err.line(), Some(2));
    }
}
