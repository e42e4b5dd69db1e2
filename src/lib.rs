//! Evaluation of tabletop dice expressions (`4d6kh3!`, `2d20kh1+5`, `1df!`)
//! with structural bounds and positional reroll replay.
//!
//! ```
//! use dice_replay::RandomEngine;
//!
//! let mut engine = RandomEngine::seeded(1);
//! let first = dice_replay::roll("2d20kh1 + 5", &mut engine, None).unwrap();
//! assert!(first.minimum() <= first.total() && first.total() <= first.maximum());
//!
//! // Redraw only the second d20; the first is replayed as rolled.
//! let second = dice_replay::reroll(&first, [1], &mut engine).unwrap();
//! assert_eq!(second.raw_rolls()[0], first.raw_rolls()[0]);
//! assert_eq!(second.parent_id(), Some(first.id()));
//! ```

mod common;
mod error;
pub mod parse;
pub mod roll;

#[cfg(test)]
mod test_strategies;

use chrono::Utc;
use log::debug;

pub use common::{BinaryOperator, Float, Int, KeepDropMode, Sides, UInt};
pub use error::Error;
pub use parse::{ast, parse_expression, ParseError};
pub use roll::{
    DiceEngine, DEFAULT_MAX_ROLLS, DieResult, EvalError, RandomEngine, RerollEngine, Roll, RollHistory, RollId,
    RollOutcome,
};

/// Parses and evaluates `expression`, recording the result as a new root roll.
///
/// # Errors
/// [`Error::Parse`] for malformed input, [`Error::Eval`] if evaluation fails.
pub fn roll(
    expression: &str,
    engine: &mut dyn DiceEngine,
    context_json: Option<String>,
) -> Result<Roll, Error> {
    roll_bounded(expression, engine, context_json, Some(DEFAULT_MAX_ROLLS))
}

/// [`roll`] with a caller-chosen roll budget (`None` for no limit).
///
/// # Errors
/// See [`roll`].
pub fn roll_bounded(
    expression: &str,
    engine: &mut dyn DiceEngine,
    context_json: Option<String>,
    max_rolls: Option<usize>,
) -> Result<Roll, Error> {
    let expr = parse_expression(expression)?;
    let outcome = expr.evaluate_bounded(engine, max_rolls)?;
    let roll = Roll::create(expression, outcome, Utc::now(), context_json);
    debug!("roll {}: {}", roll.id(), roll);
    Ok(roll)
}

/// Evaluates `original`'s expression again, replaying its draws except at
/// `positions`, which are drawn from `fallback`.
///
/// A replayed draw whose die type no longer matches (a redrawn die
/// exploded or stopped exploding) is drawn from `fallback` as well.
///
/// # Errors
/// See [`roll`].
pub fn reroll(
    original: &Roll,
    positions: impl IntoIterator<Item = usize>,
    fallback: &mut dyn DiceEngine,
) -> Result<Roll, Error> {
    reroll_bounded(original, positions, fallback, Some(DEFAULT_MAX_ROLLS))
}

/// [`reroll`] with a caller-chosen roll budget (`None` for no limit).
///
/// # Errors
/// See [`roll`].
pub fn reroll_bounded(
    original: &Roll,
    positions: impl IntoIterator<Item = usize>,
    fallback: &mut dyn DiceEngine,
    max_rolls: Option<usize>,
) -> Result<Roll, Error> {
    let expr = original.parse()?;
    let mut engine = RerollEngine::new(original.raw_rolls(), positions, fallback);
    let outcome = expr.evaluate_bounded(&mut engine, max_rolls)?;
    let roll = Roll::reroll(original, outcome, Utc::now());
    debug!("roll {} rerolled as {}: {}", original.id(), roll.id(), roll);
    Ok(roll)
}
