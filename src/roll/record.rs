use super::outcome::{DieResult, RollOutcome};
use crate::common::*;
use crate::parse::{ast::Expression, parse_expression, ParseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollId(Uuid);

impl RollId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RollId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A realized roll of an expression, as handed to persistence.
///
/// Rolls are never changed after creation. A reroll is a new `Roll` that
/// points back at the roll it came from, so lineage forms a tree rooted
/// at the first roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roll {
    id: RollId,
    expression: String,
    outcome: RollOutcome,
    rolled_at: DateTime<Utc>,
    context_json: Option<String>,
    parent_id: Option<RollId>,
    root_id: RollId,
}

impl Roll {
    pub fn create(
        expression: impl Into<String>,
        outcome: RollOutcome,
        rolled_at: DateTime<Utc>,
        context_json: Option<String>,
    ) -> Self {
        let id = RollId::new();
        Self {
            id,
            expression: expression.into(),
            outcome,
            rolled_at,
            context_json,
            parent_id: None,
            root_id: id,
        }
    }

    /// A new roll of `original`'s expression and context, linked to it as parent.
    pub fn reroll(original: &Roll, outcome: RollOutcome, rolled_at: DateTime<Utc>) -> Self {
        Self {
            id: RollId::new(),
            expression: original.expression.clone(),
            outcome,
            rolled_at,
            context_json: original.context_json.clone(),
            parent_id: Some(original.id),
            root_id: original.root_id,
        }
    }

    pub fn id(&self) -> RollId {
        self.id
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Parses the stored expression again.
    ///
    /// # Errors
    /// Only if the stored text was never a valid expression.
    pub fn parse(&self) -> Result<Expression, ParseError> {
        parse_expression(&self.expression)
    }

    pub fn outcome(&self) -> &RollOutcome {
        &self.outcome
    }

    pub fn total(&self) -> Int {
        self.outcome.total()
    }

    pub fn minimum(&self) -> Int {
        self.outcome.minimum()
    }

    pub fn maximum(&self) -> Int {
        self.outcome.maximum()
    }

    pub fn average(&self) -> Float {
        self.outcome.average()
    }

    pub fn raw_rolls(&self) -> &[DieResult] {
        self.outcome.raw_rolls()
    }

    pub fn kept_rolls(&self) -> &[DieResult] {
        self.outcome.kept_rolls()
    }

    pub fn rolled_at(&self) -> DateTime<Utc> {
        self.rolled_at
    }

    pub fn context_json(&self) -> Option<&str> {
        self.context_json.as_deref()
    }

    pub fn parent_id(&self) -> Option<RollId> {
        self.parent_id
    }

    /// The first roll of this lineage; a root roll's own id.
    pub fn root_id(&self) -> RollId {
        self.root_id
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.expression, self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(total: Int) -> RollOutcome {
        let dice = vec![DieResult::new(total, "20")];
        RollOutcome::new(total, 1, 20, 10.5, dice.clone(), dice)
    }

    #[test]
    fn test_create() {
        let now = Utc::now();
        let roll = Roll::create("1d20", outcome(12), now, Some(r#"{"channel":"dm"}"#.to_string()));
        assert!(roll.is_root());
        assert_eq!(roll.root_id(), roll.id());
        assert_eq!(roll.expression(), "1d20");
        assert_eq!(roll.total(), 12);
        assert_eq!(roll.rolled_at(), now);
        assert_eq!(roll.context_json(), Some(r#"{"channel":"dm"}"#));
        assert_eq!(roll.parse().unwrap().to_string(), "1d20");
    }

    #[test]
    fn test_reroll_links_parent() {
        let first = Roll::create("1d20", outcome(3), Utc::now(), Some("{}".to_string()));
        let second = Roll::reroll(&first, outcome(17), Utc::now());
        let third = Roll::reroll(&second, outcome(9), Utc::now());

        assert_ne!(second.id(), first.id());
        assert_eq!(second.parent_id(), Some(first.id()));
        assert_eq!(second.expression(), first.expression());
        assert_eq!(second.context_json(), first.context_json());
        assert_eq!(second.total(), 17);
        assert_eq!(first.total(), 3);

        assert_eq!(third.parent_id(), Some(second.id()));
        assert_eq!(third.root_id(), first.id());
    }

    #[test]
    fn test_serde_round_trip() {
        let roll = Roll::create("1d20", outcome(12), Utc::now(), None);
        let json = serde_json::to_string(&roll).unwrap();
        assert!(json.contains(&format!("\"id\":\"{}\"", roll.id())));
        assert!(json.contains("\"face_label\":\"20\""));
        let back: Roll = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roll);
    }
}
