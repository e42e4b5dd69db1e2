use std::fmt::{self, Write};
use std::num::NonZeroU32;
pub use vec1::vec1;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type Float = f64;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// The kind of die a [`DiceRoll`](crate::ast::DiceRoll) draws.
///
/// At the raw-number boundary a side count of `0` stands for a fate die.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sides {
    Poly(NonZeroUInt),
    Fate,
}

impl Sides {
    pub const FATE_LABEL: &'static str = "f";

    pub fn from_raw(sides: UInt) -> Self {
        NonZeroUInt::new(sides).map_or(Self::Fate, Self::Poly)
    }

    pub fn raw(self) -> UInt {
        match self {
            Self::Poly(x) => x.get(),
            Self::Fate => 0,
        }
    }

    pub fn min_face(self) -> Int {
        match self {
            Self::Poly(_) => 1,
            Self::Fate => -1,
        }
    }

    /// The face that makes an exploding die roll again.
    pub fn max_face(self) -> Int {
        match self {
            Self::Poly(x) => Int::from(x.get()),
            Self::Fate => 1,
        }
    }

    pub fn average(self) -> Float {
        match self {
            Self::Poly(x) => (1.0 + Float::from(x.get())) / 2.0,
            Self::Fate => 0.0,
        }
    }

    /// The face label attached to every die of this kind.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Sides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poly(x) => fmt::Display::fmt(x, f),
            Self::Fate => f.write_str(Self::FATE_LABEL),
        }
    }
}

impl From<NonZeroUInt> for Sides {
    fn from(x: NonZeroUInt) -> Self {
        Self::Poly(x)
    }
}

impl From<UInt> for Sides {
    fn from(x: UInt) -> Self {
        Self::from_raw(x)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    pub(crate) const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }
}

impl TryFrom<char> for BinaryOperator {
    type Error = crate::roll::EvalError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c {
            '+' => Self::Add,
            '-' => Self::Sub,
            '*' => Self::Mul,
            '/' => Self::Div,
            _ => return Err(crate::roll::EvalError::InvalidOperator(c)),
        })
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum KeepDropMode {
    #[default]
    None,
    KeepHighest,
    KeepLowest,
    DropHighest,
    DropLowest,
}

impl KeepDropMode {
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for KeepDropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "",
            Self::KeepHighest => "kh",
            Self::KeepLowest => "kl",
            Self::DropHighest => "dh",
            Self::DropLowest => "dl",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_from_raw() {
        assert_eq!(Sides::from_raw(0), Sides::Fate);
        assert_eq!(Sides::from_raw(20).raw(), 20);
        assert_eq!(Sides::Fate.raw(), 0);
    }

    #[test]
    fn test_sides_faces() {
        let d6 = Sides::from_raw(6);
        assert_eq!((d6.min_face(), d6.max_face()), (1, 6));
        assert_eq!(d6.average(), 3.5);
        assert_eq!(d6.label(), "6");
        assert_eq!((Sides::Fate.min_face(), Sides::Fate.max_face()), (-1, 1));
        assert_eq!(Sides::Fate.average(), 0.0);
        assert_eq!(Sides::Fate.label(), "f");
    }

    #[test]
    fn test_operator_from_char() {
        assert_eq!(BinaryOperator::try_from('/'), Ok(BinaryOperator::Div));
        assert_eq!(
            BinaryOperator::try_from('%'),
            Err(crate::roll::EvalError::InvalidOperator('%'))
        );
    }
}
