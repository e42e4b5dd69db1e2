use super::outcome::DieResult;
use crate::common::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of die draws.
///
/// Engines are stateful; create one per evaluation and never share one
/// between concurrent evaluations.
pub trait DiceEngine {
    /// Draws one die. Fate dice yield -1, 0 or +1 labeled `"f"`; other dice
    /// yield `1..=sides` labeled with the side count.
    fn roll(&mut self, sides: Sides) -> DieResult;
}

impl<E: DiceEngine + ?Sized> DiceEngine for &mut E {
    fn roll(&mut self, sides: Sides) -> DieResult {
        (**self).roll(sides)
    }
}

impl<E: DiceEngine + ?Sized> DiceEngine for Box<E> {
    fn roll(&mut self, sides: Sides) -> DieResult {
        (**self).roll(sides)
    }
}

/// Draws dice uniformly from a pseudo-random source.
#[derive(Debug, Clone)]
pub struct RandomEngine<R = ChaCha8Rng> {
    rng: R,
}

impl RandomEngine {
    /// A reproducible engine: equal seeds give equal draw sequences.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> RandomEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DiceEngine for RandomEngine<R> {
    fn roll(&mut self, sides: Sides) -> DieResult {
        let value = match sides {
            Sides::Poly(x) => Int::from(self.rng.gen_range(1..=x.get())),
            Sides::Fate => self.rng.gen_range(-1..=1),
        };
        DieResult::of(sides, value)
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedEngine;
