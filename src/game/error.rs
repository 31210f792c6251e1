//! Engine error types.

use derive_more::Display;

use crate::db::DbError;
use crate::store::StoreError;

/// Failure surfaced by [`GameEngine`](super::GameEngine).
///
/// A missing game is never an error at this level: it is reported as `None`
/// or an empty list instead.
#[derive(Debug, Clone, Display)]
pub enum EngineError {
    /// The guess does not have as many characters as the answer.
    #[display("Invalid guess \"{}\": expected {} characters", guess, expected)]
    InvalidGuess {
        /// The rejected guess.
        guess: String,
        /// Length of the answer.
        expected: usize,
    },

    /// The store could not complete the operation.
    #[display("Storage failure: {}", _0)]
    Storage(DbError),
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidGuess { .. } => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        Self::Storage(err)
    }
}

/// Splits a store result into found / not found, keeping real failures.
pub(crate) fn found<T>(result: Result<T, StoreError>) -> Result<Option<T>, EngineError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::GameNotFound(_)) => Ok(None),
        Err(StoreError::Database(err)) => Err(EngineError::Storage(err)),
    }
}
