use super::lexer::TokenKind;
use crate::common::NonEmpty;
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
#[error("invalid dice expression at position {position} ({slice:?}): {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Character offset into the input; the input length at end of input.
    pub position: usize,
    pub slice: String,
}

impl ParseError {
    pub const INVALID_FORMAT: &'static str = "DiceExpression.InvalidFormat";

    pub fn code(&self) -> &'static str {
        Self::INVALID_FORMAT
    }

    /// Folds a competing failure into this one, keeping whichever got further.
    pub(crate) fn merge(&mut self, other: ParseError) {
        if other.position > self.position {
            *self = other;
            return;
        }
        if other.position < self.position {
            return;
        }
        if let (
            ParseErrorKind::UnexpectedToken { expected, .. },
            ParseErrorKind::UnexpectedToken { expected: more, .. },
        ) = (&mut self.kind, other.kind)
        {
            for kind in more.into_vec() {
                if !expected.contains(&kind) {
                    expected.push(kind);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: NonEmpty<TokenKind>,
    },
    UnexpectedString {
        expected: NonEmpty<TokenKind>,
    },
    NumberTooLarge,
    ZeroDice,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found: Some(found), expected } => {
                write!(f, "unexpected token: found {}, expected ", found)?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedToken { found: None, expected } => {
                write!(f, "unexpected end of input, expected ")?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedString { expected } => {
                write!(f, "unrecognized input, expected ")?;
                fmt_expected(expected, f)
            }
            Self::NumberTooLarge => f.write_str("number is too large"),
            Self::ZeroDice => f.write_str("dice need a count and a side count of at least 1"),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expected {
        [] => Ok(()),
        [a] => f.write_str(a.as_str()),
        [a, b] => write!(f, "{} or {}", a, b),
        [rest @ .., last] => {
            for exp in rest {
                write!(f, "{}, ", exp)?;
            }
            write!(f, "or {}", last)
        }
    }
}
