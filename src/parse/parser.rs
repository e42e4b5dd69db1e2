use super::{ast::*, error::*, lexer::*};
use crate::common::*;
use std::str::FromStr;

type PResult<T = Expression> = Result<T, ParseError>;

/// Recursive-descent parser over a pre-lexed token stream.
///
/// A parser is consumed by [`Parser::parse`], so each instance handles
/// exactly one expression.
pub struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    furthest: Option<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: tokenize(text),
            pos: 0,
            furthest: None,
        }
    }

    pub fn parse(mut self) -> PResult {
        let result = self.parse_expression().and_then(|expr| {
            if self.at_end() {
                Ok(expr)
            } else {
                Err(self.unexpected(vec1![
                    TokenKind::Plus,
                    TokenKind::Minus,
                    TokenKind::Star,
                    TokenKind::Slash
                ]))
            }
        });
        // Backtracking may have failed further along than the final error.
        result.map_err(|err| self.furthest.take().unwrap_or(err))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let kind = self.peek()?;
        self.pos += 1;
        Some(kind)
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn matches_any(&self, options: &[TokenKind]) -> bool {
        self.peek().map_or(false, |peeked| options.contains(&peeked))
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        let found = self.matches(kind);
        if found {
            self.pos += 1;
        }
        found
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(vec1![expected]))
        }
    }

    fn slice_at(&self, index: usize) -> &'a str {
        let text = self.text;
        self.tokens.get(index).map_or("", |t| &text[t.span.clone()])
    }

    fn position_at(&self, index: usize) -> usize {
        let byte = self.tokens.get(index).map_or(self.text.len(), |t| t.span.start);
        self.text[..byte].chars().count()
    }

    fn error_at(&mut self, index: usize, kind: ParseErrorKind) -> ParseError {
        let err = ParseError {
            kind,
            position: self.position_at(index),
            slice: self.slice_at(index).to_string(),
        };
        match &mut self.furthest {
            Some(furthest) => furthest.merge(err.clone()),
            None => self.furthest = Some(err.clone()),
        }
        err
    }

    fn unexpected(&mut self, expected: NonEmpty<TokenKind>) -> ParseError {
        let kind = match self.peek() {
            Some(TokenKind::Error) => ParseErrorKind::UnexpectedString { expected },
            found => ParseErrorKind::UnexpectedToken { found, expected },
        };
        self.error_at(self.pos, kind)
    }

    fn parse_integer<T: FromStr>(&mut self) -> PResult<T> {
        let index = self.pos;
        self.consume(TokenKind::Integer)?;
        self.slice_at(index)
            .parse()
            .map_err(|_| self.error_at(index, ParseErrorKind::NumberTooLarge))
    }

    fn parse_operator(&mut self) -> PResult<BinaryOperator> {
        match self.peek().and_then(|kind| kind.as_binary_op()) {
            Some(op) => {
                self.pos += 1;
                Ok(op)
            }
            None => Err(self.unexpected(vec1![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash
            ])),
        }
    }

    fn parse_expression(&mut self) -> PResult {
        let mut lhs = self.parse_term()?;

        while self.matches_any(TokenKind::ADDITION_OPS) {
            let op = self.parse_operator()?;
            let rhs = self.parse_term()?;

            lhs = BinaryOperation::new(lhs, op, rhs).into();
        }

        Ok(lhs)
    }

    fn parse_term(&mut self) -> PResult {
        let mut lhs = self.parse_factor()?;

        while self.matches_any(TokenKind::MULTIPLICATION_OPS) {
            let op = self.parse_operator()?;
            let rhs = self.parse_factor()?;

            lhs = BinaryOperation::new(lhs, op, rhs).into();
        }

        Ok(lhs)
    }

    fn parse_factor(&mut self) -> PResult {
        match self.peek() {
            Some(TokenKind::LeftParen) => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RightParen)?;
                Ok(inner)
            }
            Some(TokenKind::Integer | TokenKind::D) => {
                let start = self.pos;
                match self.parse_dice() {
                    Ok(dice) => Ok(dice.into()),
                    Err(_) => {
                        self.pos = start;
                        self.parse_number()
                    }
                }
            }
            _ => Err(self.unexpected(vec1![
                TokenKind::LeftParen,
                TokenKind::Integer,
                TokenKind::D
            ])),
        }
    }

    fn parse_number(&mut self) -> PResult {
        let value = self.parse_integer::<Int>()?;
        Ok(NumberLiteral::new(value).into())
    }

    fn parse_dice(&mut self) -> PResult<DiceRoll> {
        let count = if self.matches(TokenKind::Integer) {
            self.parse_integer::<UInt>()?
        } else {
            1
        };

        let separator = self.pos;
        self.consume(TokenKind::D)?;
        if count == 0 {
            return Err(self.error_at(separator, ParseErrorKind::ZeroDice));
        }

        let sides = match self.peek() {
            Some(TokenKind::Fate) => {
                self.advance();
                Sides::Fate
            }
            Some(TokenKind::Integer) => {
                let index = self.pos;
                match self.parse_integer::<UInt>()? {
                    0 => return Err(self.error_at(index, ParseErrorKind::ZeroDice)),
                    n => Sides::from_raw(n),
                }
            }
            _ => return Err(self.unexpected(vec1![TokenKind::Integer, TokenKind::Fate])),
        };

        let mut dice = DiceRoll::new(count, sides);
        if self.eat(TokenKind::Bang) {
            dice = dice.exploding();
        }

        if self.matches_any(TokenKind::MODE_OPS) {
            let (mode, mode_count) = self.parse_mode()?;
            dice = dice.with_mode(mode, mode_count);
        }

        Ok(dice)
    }

    fn parse_mode(&mut self) -> PResult<(KeepDropMode, UInt)> {
        let keep = self.advance() == Some(TokenKind::Keep);

        if !self.matches_any(TokenKind::SELECTORS) {
            return Err(self.unexpected(vec1![TokenKind::Highest, TokenKind::Lowest]));
        }
        let highest = self.advance() == Some(TokenKind::Highest);

        use KeepDropMode::*;
        let mode = match (keep, highest) {
            (true, true) => KeepHighest,
            (true, false) => KeepLowest,
            (false, true) => DropHighest,
            (false, false) => DropLowest,
        };

        let mode_count = if self.matches(TokenKind::Integer) {
            self.parse_integer()?
        } else {
            1
        };
        Ok((mode, mode_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> PResult {
        Parser::new(s).parse()
    }

    fn check(s: &str, expected: impl Into<Expression>) {
        let parsed = parse(s).unwrap();
        assert_eq!(parsed, expected.into());
    }

    fn check_err(s: &str, position: usize) -> ParseErrorKind {
        let err = parse(s).unwrap_err();
        assert_eq!(err.position, position, "{}", err);
        assert_eq!(err.code(), "DiceExpression.InvalidFormat");
        err.kind
    }

    fn num(x: Int) -> NumberLiteral {
        NumberLiteral::new(x)
    }

    fn bin(l: impl Into<Expression>, op: BinaryOperator, r: impl Into<Expression>) -> BinaryOperation {
        BinaryOperation::new(l, op, r)
    }

    #[test]
    fn test_parse_nums() {
        check("32", num(32));
        check("  7 ", num(7));
    }

    #[test]
    fn test_parse_dice() {
        check("1d20", DiceRoll::new(1, 20));
        check("d4", DiceRoll::new(1, 4));
        check("4D6", DiceRoll::new(4, 6));
        check("1df", DiceRoll::new(1, Sides::Fate));
        check("3dF!", DiceRoll::new(3, Sides::Fate).exploding());
        check("4d6kh3", DiceRoll::new(4, 6).with_mode(KeepDropMode::KeepHighest, 3));
        check("2d20kl", DiceRoll::new(2, 20).with_mode(KeepDropMode::KeepLowest, 1));
        check("4d6!dl1", DiceRoll::new(4, 6).exploding().with_mode(KeepDropMode::DropLowest, 1));
        check("5d10DH2", DiceRoll::new(5, 10).with_mode(KeepDropMode::DropHighest, 2));
        check("4 d 6 k h 3", DiceRoll::new(4, 6).with_mode(KeepDropMode::KeepHighest, 3));
    }

    #[test]
    fn test_parse_binary() {
        use BinaryOperator::*;

        check("2 + 2", bin(num(2), Add, num(2)));
        check("1 + 2 * 3", bin(num(1), Add, bin(num(2), Mul, num(3))));
        check("10 - 2 - 3", bin(bin(num(10), Sub, num(2)), Sub, num(3)));
        check("8 / 4 / 2", bin(bin(num(8), Div, num(4)), Div, num(2)));
        check(
            "(1d6 + 2) * 3",
            bin(bin(DiceRoll::new(1, 6), Add, num(2)), Mul, num(3)),
        );
        check(
            "2d20kh1+5",
            bin(DiceRoll::new(2, 20).with_mode(KeepDropMode::KeepHighest, 1), Add, num(5)),
        );
        check("1-d4", bin(num(1), Sub, DiceRoll::new(1, 4)));
    }

    #[test]
    fn test_err_empty() {
        let kind = check_err("", 0);
        assert!(matches!(kind, ParseErrorKind::UnexpectedToken { found: None, .. }));
        check_err("   ", 3);
    }

    #[test]
    fn test_err_trailing_operator() {
        let kind = check_err("1 +", 3);
        assert_eq!(
            kind,
            ParseErrorKind::UnexpectedToken {
                found: None,
                expected: vec1![TokenKind::LeftParen, TokenKind::Integer, TokenKind::D],
            }
        );
    }

    #[test]
    fn test_err_missing_selector() {
        let kind = check_err("4d6k", 4);
        assert_eq!(
            kind,
            ParseErrorKind::UnexpectedToken {
                found: None,
                expected: vec1![TokenKind::Highest, TokenKind::Lowest],
            }
        );
        let kind = check_err("4d6kx", 4);
        assert!(matches!(kind, ParseErrorKind::UnexpectedString { .. }));
    }

    #[test]
    fn test_err_missing_sides() {
        check_err("2d", 2);
        check_err("2d+1", 2);
    }

    #[test]
    fn test_err_parens() {
        check_err("(1 + 2", 6);
        check_err("1 + 2)", 5);
    }

    #[test]
    fn test_err_zero_dice() {
        assert_eq!(check_err("0d6", 1), ParseErrorKind::ZeroDice);
        assert_eq!(check_err("d0", 1), ParseErrorKind::ZeroDice);
    }

    #[test]
    fn test_err_too_large() {
        assert_eq!(check_err("99999999999999999999", 0), ParseErrorKind::NumberTooLarge);
    }

    #[test]
    fn test_err_position_is_in_chars() {
        let kind = check_err("ü + 1", 0);
        assert!(matches!(kind, ParseErrorKind::UnexpectedString { .. }));
        check_err("1 + é", 4);
    }
}
