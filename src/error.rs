use thiserror::Error;

use crate::types::WordId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillError {
    /// Construction-time input problem; fatal for the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown word id: {0}")]
    UnknownWord(WordId),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    /// Internal bookkeeping out of sync; a programming error.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type DrillResult<T> = Result<T, DrillError>;
