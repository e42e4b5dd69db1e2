use super::{error::EvalError, outcome::*, roller::DiceEngine, EResult};
use crate::common::*;
use crate::parse::ast::{Evaluate, Expression};
use log::{debug, trace};

/// Upper bound on dice drawn by a single [`Expression::evaluate`] call.
pub const DEFAULT_MAX_ROLLS: usize = 1000;

/// Per-evaluation state: the engine being drawn from and the roll budget.
pub struct RollContext<'e> {
    max_rolls: Option<usize>,
    rolls: usize,
    engine: &'e mut dyn DiceEngine,
}

impl<'e> RollContext<'e> {
    pub fn new(max_rolls: Option<usize>, engine: &'e mut dyn DiceEngine) -> Self {
        Self {
            max_rolls,
            rolls: 0,
            engine,
        }
    }

    pub fn new_bounded(max_rolls: usize, engine: &'e mut dyn DiceEngine) -> Self {
        Self::new(Some(max_rolls), engine)
    }

    pub fn new_unbounded(engine: &'e mut dyn DiceEngine) -> Self {
        Self::new(None, engine)
    }

    /// Dice drawn so far.
    pub fn rolls(&self) -> usize {
        self.rolls
    }

    /// Fails early if `n` more draws would exceed the budget.
    pub fn reserve(&self, n: usize) -> EResult<()> {
        match self.max_rolls {
            Some(max) if self.rolls.saturating_add(n) > max => Err(EvalError::TooManyRolls(max)),
            _ => Ok(()),
        }
    }

    fn count_rolls(&mut self, n: usize) -> EResult<()> {
        self.reserve(n)?;
        self.rolls += n;
        Ok(())
    }

    pub fn roll_one(&mut self, sides: Sides) -> EResult<DieResult> {
        self.count_rolls(1)?;
        let die = self.engine.roll(sides);
        trace!("draw #{}: d{} -> {}", self.rolls, sides, die.value);
        Ok(die)
    }

    pub fn eval(&mut self, expr: &Expression) -> EResult<RollOutcome> {
        let outcome = expr.eval(self)?;
        debug!("{} => {} ({} dice)", expr, outcome.total(), self.rolls);
        Ok(outcome)
    }
}
