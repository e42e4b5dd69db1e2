use super::{
    ctx::DEFAULT_MAX_ROLLS,
    record::{Roll, RollId},
    roller::DiceEngine,
};
use crate::error::Error;
use std::collections::HashMap;

/// An in-memory store of rolls that keeps track of reroll lineage.
#[derive(Debug, Default)]
pub struct RollHistory {
    rolls: HashMap<RollId, Roll>,
    children: HashMap<RollId, Vec<RollId>>,
}

impl RollHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }

    pub fn insert(&mut self, roll: Roll) -> RollId {
        let id = roll.id();
        if let Some(parent) = roll.parent_id() {
            self.children.entry(parent).or_default().push(id);
        }
        self.rolls.insert(id, roll);
        id
    }

    /// # Errors
    /// [`Error::RollNotFound`] if no roll has this id.
    pub fn get(&self, id: RollId) -> Result<&Roll, Error> {
        self.rolls.get(&id).ok_or(Error::RollNotFound(id))
    }

    /// Direct rerolls of `id`, oldest first.
    pub fn children(&self, id: RollId) -> impl Iterator<Item = &Roll> + '_ {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(move |child| self.rolls.get(child))
    }

    /// The parent chain of `id`, nearest first. Stops at the first roll not in this history.
    pub fn ancestors(&self, id: RollId) -> Vec<&Roll> {
        let mut ret = Vec::new();
        let mut next = self.rolls.get(&id).and_then(Roll::parent_id);
        while let Some(roll) = next.and_then(|parent| self.rolls.get(&parent)) {
            ret.push(roll);
            next = roll.parent_id();
        }
        ret
    }

    /// # Errors
    /// [`Error::RollNotFound`] if `id` or its root is missing.
    pub fn root(&self, id: RollId) -> Result<&Roll, Error> {
        let root = self.get(id)?.root_id();
        self.get(root)
    }

    /// Rerolls a stored roll at `positions` with the default roll budget
    /// and stores the result.
    ///
    /// # Errors
    /// [`Error::RollNotFound`] for an unknown id, otherwise whatever
    /// [`crate::reroll`] reports.
    pub fn reroll(
        &mut self,
        id: RollId,
        positions: impl IntoIterator<Item = usize>,
        fallback: &mut dyn DiceEngine,
    ) -> Result<RollId, Error> {
        self.reroll_bounded(id, positions, fallback, Some(DEFAULT_MAX_ROLLS))
    }

    /// # Errors
    /// See [`RollHistory::reroll`].
    pub fn reroll_bounded(
        &mut self,
        id: RollId,
        positions: impl IntoIterator<Item = usize>,
        fallback: &mut dyn DiceEngine,
        max_rolls: Option<usize>,
    ) -> Result<RollId, Error> {
        let roll = crate::reroll_bounded(self.get(id)?, positions, fallback, max_rolls)?;
        Ok(self.insert(roll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::roller::ScriptedEngine;

    #[test]
    fn test_lineage() {
        let mut history = RollHistory::new();
        let first = crate::roll("2d20kh1", &mut ScriptedEngine::new([7, 11]), None).unwrap();
        let root = history.insert(first);

        let a = history.reroll(root, [0], &mut ScriptedEngine::new([15])).unwrap();
        let b = history.reroll(root, [1], &mut ScriptedEngine::new([2])).unwrap();
        let c = history.reroll(a, [], &mut ScriptedEngine::new([])).unwrap();

        assert_eq!(history.len(), 4);
        let children: Vec<_> = history.children(root).map(Roll::id).collect();
        assert_eq!(children, vec![a, b]);
        assert_eq!(history.children(b).count(), 0);

        let ancestors: Vec<_> = history.ancestors(c).into_iter().map(Roll::id).collect();
        assert_eq!(ancestors, vec![a, root]);
        assert_eq!(history.root(c).unwrap().id(), root);

        assert_eq!(history.get(a).unwrap().total(), 15);
        assert_eq!(history.get(b).unwrap().total(), 7);
        assert_eq!(history.get(c).unwrap().outcome(), history.get(a).unwrap().outcome());
    }

    #[test]
    fn test_unbounded_reroll() {
        let mut history = RollHistory::new();
        let mut engine = ScriptedEngine::new(std::iter::repeat(3).take(1200));
        let big = crate::roll_bounded("1200d4", &mut engine, None, None).unwrap();
        let root = history.insert(big);

        assert!(history.reroll(root, [5], &mut ScriptedEngine::new([])).is_err());
        assert_eq!(history.len(), 1);

        let child = history
            .reroll_bounded(root, [5], &mut ScriptedEngine::new([4]), None)
            .unwrap();
        assert_eq!(history.get(child).unwrap().total(), 3601);
        assert_eq!(history.root(child).unwrap().id(), root);
    }

    #[test]
    fn test_not_found() {
        let mut history = RollHistory::new();
        let missing = RollId::new();
        let err = history.get(missing).unwrap_err();
        assert_eq!(err, Error::RollNotFound(missing));
        assert_eq!(err.code(), "Roll.NotFound");
        assert!(history
            .reroll(missing, [0], &mut ScriptedEngine::new([]))
            .is_err());
        assert!(history.is_empty());
    }
}
