pub mod ast;
mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::TokenKind;
pub use parser::Parser;

/// Parses a dice expression such as `4d6kh3 + 2` or `1df!`.
///
/// # Examples
/// ```
/// # use dice_replay::parse::parse_expression;
/// let expr = parse_expression("2d20kh1 + 5").unwrap();
/// assert_eq!(expr.to_string(), "2d20kh1 + 5");
/// ```
pub fn parse_expression(s: &str) -> Result<ast::Expression, ParseError> {
    Parser::new(s).parse()
}
