use crate::common::*;
use crate::roll::{DiceEngine, EResult, EvalError, RollContext, RollOutcome, DEFAULT_MAX_ROLLS};
use std::fmt;

/// Evaluation of one node against the dice drawn through `ctx`.
#[enum_dispatch::enum_dispatch]
pub trait Evaluate {
    fn eval(&self, ctx: &mut RollContext<'_>) -> EResult<RollOutcome>;
}

/// A parsed dice expression.
///
/// The tree is immutable once built; every evaluation is an independent
/// walk that draws dice left to right, depth first.
#[derive(Debug, Clone, Eq, PartialEq)]
#[enum_dispatch::enum_dispatch(Evaluate)]
pub enum Expression {
    NumberLiteral(NumberLiteral),
    DiceRoll(DiceRoll),
    BinaryOperation(BinaryOperation),
}

impl Expression {
    /// Evaluates the expression with the default roll budget.
    ///
    /// # Errors
    /// Fails on division by zero, integer overflow, or when more than
    /// [`DEFAULT_MAX_ROLLS`] dice would be drawn.
    pub fn evaluate(&self, engine: &mut dyn DiceEngine) -> Result<RollOutcome, EvalError> {
        self.evaluate_bounded(engine, Some(DEFAULT_MAX_ROLLS))
    }

    /// Evaluates the expression, drawing at most `max_rolls` dice (`None` for no limit).
    ///
    /// # Errors
    /// See [`Expression::evaluate`].
    pub fn evaluate_bounded(
        &self,
        engine: &mut dyn DiceEngine,
        max_rolls: Option<usize>,
    ) -> Result<RollOutcome, EvalError> {
        let mut ctx = RollContext::new(max_rolls, engine);
        ctx.eval(self)
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::BinaryOperation(b) => b.op.precedence(),
            _ => u8::MAX,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberLiteral(x) => fmt::Display::fmt(x, f),
            Self::DiceRoll(x) => fmt::Display::fmt(x, f),
            Self::BinaryOperation(x) => fmt::Display::fmt(x, f),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NumberLiteral {
    pub value: Int,
}

impl NumberLiteral {
    pub fn new(value: Int) -> Self {
        Self { value }
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DiceRoll {
    pub count: UInt,
    pub sides: Sides,
    pub explode: bool,
    pub mode: KeepDropMode,
    pub mode_count: UInt,
}

impl DiceRoll {
    pub fn new(count: UInt, sides: impl Into<Sides>) -> Self {
        Self {
            count,
            sides: sides.into(),
            explode: false,
            mode: KeepDropMode::None,
            mode_count: 1,
        }
    }

    pub fn exploding(mut self) -> Self {
        self.explode = true;
        self
    }

    pub fn with_mode(mut self, mode: KeepDropMode, mode_count: UInt) -> Self {
        self.mode = mode;
        self.mode_count = mode_count;
        self
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.explode {
            f.write_str("!")?;
        }
        if self.mode.is_active() {
            write!(f, "{}{}", self.mode, self.mode_count)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BinaryOperation {
    pub left: Box<Expression>,
    pub op: BinaryOperator,
    pub right: Box<Expression>,
}

impl BinaryOperation {
    pub fn new(left: impl Into<Expression>, op: BinaryOperator, right: impl Into<Expression>) -> Self {
        Self {
            left: Box::new(left.into()),
            op,
            right: Box::new(right.into()),
        }
    }

    /// Builds an operation from an operator character.
    ///
    /// # Errors
    /// [`EvalError::InvalidOperator`] if `op` is not one of `+ - * /`.
    pub fn from_symbol(
        left: impl Into<Expression>,
        op: char,
        right: impl Into<Expression>,
    ) -> Result<Self, EvalError> {
        Ok(Self::new(left, BinaryOperator::try_from(op)?, right))
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = self.op.precedence();
        // Operators are left-associative, so a right operand of equal precedence needs parentheses.
        write_operand(f, &self.left, self.left.precedence() < prec)?;
        write!(f, " {} ", self.op)?;
        write_operand(f, &self.right, self.right.precedence() <= prec)
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expression, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}
