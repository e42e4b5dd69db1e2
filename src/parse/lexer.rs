use crate::common::BinaryOperator;
use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,

    // Both the dice separator and the "drop" operator.
    #[regex(r"[dD]")]
    D,
    #[regex(r"[fF]")]
    Fate,
    #[token("!")]
    Bang,
    #[regex(r"[kK]")]
    Keep,
    #[regex(r"[hH]")]
    Highest,
    #[regex(r"[lL]")]
    Lowest,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub const ADDITION_OPS: &'static [Self] = &[Self::Plus, Self::Minus];

    pub const MULTIPLICATION_OPS: &'static [Self] = &[Self::Star, Self::Slash];

    pub const MODE_OPS: &'static [Self] = &[Self::Keep, Self::D];

    pub const SELECTORS: &'static [Self] = &[Self::Highest, Self::Lowest];

    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            D => "'d'",
            Fate => "'f'",
            Bang => "'!'",
            Keep => "'k'",
            Highest => "'h'",
            Lowest => "'l'",
            LeftParen => "'('",
            RightParen => "')'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Error => "<error>",
        }
    }

    pub fn as_binary_op(&self) -> Option<BinaryOperator> {
        use BinaryOperator::*;
        Some(match self {
            Self::Plus => Add,
            Self::Minus => Sub,
            Self::Star => Mul,
            Self::Slash => Div,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// Splits `s` into tokens, dropping whitespace. Spans are byte offsets.
pub fn tokenize(s: &str) -> Vec<Token> {
    TokenKind::lexer(s)
        .spanned()
        .map(|(kind, span)| Token { kind, span })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(s: &str) -> Vec<TokenKind> {
        tokenize(s).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_dice() {
        assert_eq!(kinds("4d6kh3"), vec![Integer, D, Integer, Keep, Highest, Integer]);
        assert_eq!(kinds("1DF!"), vec![Integer, D, Fate, Bang]);
        assert_eq!(kinds("2d20 dl"), vec![Integer, D, Integer, D, Lowest]);
    }

    #[test]
    fn test_lex_whitespace_and_ops() {
        assert_eq!(
            kinds(" ( 1 +\t2 ) * 3 / 4 - 5 "),
            vec![LeftParen, Integer, Plus, Integer, RightParen, Star, Integer, Slash, Integer, Minus, Integer]
        );
    }

    #[test]
    fn test_lex_error_span() {
        let tokens = tokenize("1 x");
        assert_eq!(tokens[1], Token { kind: Error, span: 2..3 });
    }
}
