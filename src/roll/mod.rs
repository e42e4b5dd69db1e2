mod ctx;
mod error;
mod eval;
mod history;
mod outcome;
mod record;
mod reroll;
mod roller;

pub type EResult<T> = Result<T, EvalError>;

pub use ctx::{RollContext, DEFAULT_MAX_ROLLS};
pub use error::EvalError;
pub use history::RollHistory;
pub use outcome::{DieResult, RollOutcome};
pub use record::{Roll, RollId};
pub use reroll::RerollEngine;
pub use roller::{DiceEngine, RandomEngine};

#[cfg(test)]
pub(crate) use roller::ScriptedEngine;
