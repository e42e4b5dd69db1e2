use crate::common::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single die draw.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DieResult {
    pub value: Int,
    /// The die type the value came from: `"20"`, `"6"`, or `"f"` for fate dice.
    pub face_label: String,
}

impl DieResult {
    pub fn new(value: Int, face_label: impl Into<String>) -> Self {
        Self {
            value,
            face_label: face_label.into(),
        }
    }

    pub fn of(sides: Sides, value: Int) -> Self {
        Self::new(value, sides.label())
    }
}

impl fmt::Display for DieResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// The result of evaluating an expression once.
///
/// `minimum` and `maximum` are derived from the expression's structure,
/// never from the drawn values, and always bracket `total`.
///
/// `average` may be infinite or NaN when an average divisor is zero
/// (`6 / 1df`). Such values serialize as the strings `"inf"`, `"-inf"`
/// and `"NaN"`, and NaN averages compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollOutcome {
    total: Int,
    minimum: Int,
    maximum: Int,
    #[serde(with = "average_repr")]
    average: Float,
    raw_rolls: Vec<DieResult>,
    kept_rolls: Vec<DieResult>,
}

impl RollOutcome {
    pub fn new(
        total: Int,
        minimum: Int,
        maximum: Int,
        average: Float,
        raw_rolls: Vec<DieResult>,
        kept_rolls: Vec<DieResult>,
    ) -> Self {
        Self {
            total,
            minimum,
            maximum,
            average,
            raw_rolls,
            kept_rolls,
        }
    }

    pub fn constant(value: Int) -> Self {
        Self::new(value, value, value, value as Float, Vec::new(), Vec::new())
    }

    pub fn total(&self) -> Int {
        self.total
    }

    pub fn minimum(&self) -> Int {
        self.minimum
    }

    pub fn maximum(&self) -> Int {
        self.maximum
    }

    pub fn average(&self) -> Float {
        self.average
    }

    /// Every die drawn, in draw order.
    pub fn raw_rolls(&self) -> &[DieResult] {
        &self.raw_rolls
    }

    pub fn kept_rolls(&self) -> &[DieResult] {
        &self.kept_rolls
    }

    pub(crate) fn into_rolls(self) -> (Vec<DieResult>, Vec<DieResult>) {
        (self.raw_rolls, self.kept_rolls)
    }
}

impl PartialEq for RollOutcome {
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total
            && self.minimum == other.minimum
            && self.maximum == other.maximum
            && (self.average == other.average || (self.average.is_nan() && other.average.is_nan()))
            && self.raw_rolls == other.raw_rolls
            && self.kept_rolls == other.kept_rolls
    }
}

mod average_repr {
    use crate::common::Float;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(Float),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Float, s: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            s.serialize_f64(*value)
        } else {
            s.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Float, D::Error> {
        match Repr::deserialize(d)? {
            Repr::Number(x) => Ok(x),
            Repr::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.total)?;
        for (i, die) in self.raw_rolls.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", die)?;
        }
        write!(
            f,
            "] (min {}, max {}, avg {})",
            self.minimum, self.maximum, self.average
        )
    }
}
