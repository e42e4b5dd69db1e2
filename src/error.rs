use crate::parse::ParseError;
use crate::roll::{EvalError, RollId};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Eval(#[from] EvalError),
    #[error("roll {0} not found")]
    RollNotFound(RollId),
}

impl Error {
    /// A stable `Area.Reason` code for callers that report errors as data.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.code(),
            Self::Eval(e) => e.code(),
            Self::RollNotFound(_) => "Roll.NotFound",
        }
    }
}
