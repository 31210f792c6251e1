//! Store error types.

use derive_more::Display;

use crate::db::DbError;
use crate::game::GameId;

/// Failure of a [`GameStore`](super::GameStore) operation.
#[derive(Debug, Clone, Display)]
pub enum StoreError {
    /// No game with this id is currently stored.
    #[display("Game \"{}\" could not be found.", _0)]
    GameNotFound(GameId),

    /// The backing database failed.
    #[display("{}", _0)]
    Database(DbError),
}

impl StoreError {
    /// Returns `true` for the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GameNotFound(_))
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::GameNotFound(_) => None,
            Self::Database(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Database(err)
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(DbError::from(err))
    }
}
