use super::{outcome::DieResult, roller::DiceEngine};
use crate::common::*;
use log::{trace, warn};
use std::collections::BTreeSet;

/// Replays a previous roll's draws, redrawing only at chosen positions.
///
/// Positions index the canonical draw order of an evaluation (left to
/// right, depth first, explosions in place). Calls at a reroll position or
/// past the end of the original draws go to the fallback. So does a call
/// whose recorded die is of another type.
#[derive(Debug)]
pub struct RerollEngine<E> {
    original: Vec<DieResult>,
    positions: BTreeSet<usize>,
    fallback: E,
    calls: usize,
}

impl<E: DiceEngine> RerollEngine<E> {
    pub fn new(
        original: impl Into<Vec<DieResult>>,
        positions: impl IntoIterator<Item = usize>,
        fallback: E,
    ) -> Self {
        Self {
            original: original.into(),
            positions: positions.into_iter().collect(),
            fallback,
            calls: 0,
        }
    }

    /// Number of draws requested so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn into_fallback(self) -> E {
        self.fallback
    }
}

impl<E: DiceEngine> DiceEngine for RerollEngine<E> {
    fn roll(&mut self, sides: Sides) -> DieResult {
        let index = self.calls;
        self.calls += 1;

        let replay = self
            .original
            .get(index)
            .filter(|_| !self.positions.contains(&index));
        match replay {
            Some(die) if die.face_label == sides.label() => {
                trace!("position {}: replay {}", index, die.value);
                return die.clone();
            }
            // The draw order shifted, e.g. a redrawn die exploded.
            Some(die) => warn!(
                "position {} recorded a d{} but a d{} is drawn; drawing fresh",
                index, die.face_label, sides
            ),
            None => {}
        }

        let die = self.fallback.roll(sides);
        trace!("position {}: fresh {}", index, die.value);
        die
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::roller::ScriptedEngine;

    fn d20(value: Int) -> DieResult {
        DieResult::new(value, "20")
    }

    #[test]
    fn test_replays_without_positions() {
        let mut engine = RerollEngine::new(vec![d20(7), d20(11)], [], ScriptedEngine::new([]));
        let d = Sides::from_raw(20);
        assert_eq!(engine.roll(d), d20(7));
        assert_eq!(engine.roll(d), d20(11));
        assert_eq!(engine.calls(), 2);
    }

    #[test]
    fn test_rerolls_selected_positions() {
        let mut engine = RerollEngine::new(vec![d20(7), d20(11), d20(3)], [0, 2], ScriptedEngine::new([19, 1]));
        let d = Sides::from_raw(20);
        assert_eq!(engine.roll(d), d20(19));
        assert_eq!(engine.roll(d), d20(11));
        assert_eq!(engine.roll(d), d20(1));
        assert_eq!(engine.into_fallback().remaining(), 0);
    }

    #[test]
    fn test_draws_past_original_are_fresh() {
        let mut engine = RerollEngine::new(vec![d20(20)], [], ScriptedEngine::new([4]));
        let d = Sides::from_raw(20);
        assert_eq!(engine.roll(d), d20(20));
        assert_eq!(engine.roll(d), d20(4));
    }

    #[test]
    fn test_out_of_range_position_is_ignored() {
        let mut engine = RerollEngine::new(vec![d20(5)], [9], ScriptedEngine::new([]));
        assert_eq!(engine.roll(Sides::from_raw(20)), d20(5));
    }

    #[test]
    fn test_other_die_type_is_drawn_fresh() {
        let mut engine = RerollEngine::new(vec![d20(15), d20(2)], [], ScriptedEngine::new([4]));
        assert_eq!(engine.roll(Sides::from_raw(6)), DieResult::new(4, "6"));
        assert_eq!(engine.roll(Sides::from_raw(20)), d20(2));
        assert_eq!(engine.calls(), 2);
        assert_eq!(engine.into_fallback().remaining(), 0);
    }
}
