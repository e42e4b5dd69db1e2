use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum EvalError {
    #[error("invalid operator {0:?}")]
    InvalidOperator(char),
    #[error("cannot divide by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("too many dice rolled (limit is {0})")]
    TooManyRolls(usize),
}

impl EvalError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOperator(_) => "DiceExpression.InvalidOperator",
            Self::DivisionByZero => "DiceExpression.DivisionByZero",
            Self::Overflow => "DiceExpression.Overflow",
            Self::TooManyRolls(_) => "DiceExpression.TooManyRolls",
        }
    }
}
