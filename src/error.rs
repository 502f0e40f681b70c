//! Error taxonomy for session lifecycle operations.

use derive_more::{Display, Error};

use crate::db::DbError;

/// Failure modes of the game service.
///
/// Rejected moves are not represented here: a move the rules decline is a
/// normal [`MoveOutcome`](crate::MoveOutcome) value, not an error.
#[derive(Debug, Clone, Display, Error)]
pub enum GameError {
    /// A game id or session id did not resolve to a known entity.
    #[display("not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The action does not fit the session (wrong game type, or the
    /// session has already ended).
    #[display("invalid state: {_0}")]
    InvalidState(#[error(not(source))] String),
    /// A stored state blob failed per-game schema validation.
    #[display("corrupt session state: {_0}")]
    Corrupt(#[error(not(source))] String),
    /// Underlying storage failure, propagated unchanged.
    #[display("{_0}")]
    Storage(DbError),
}

impl From<DbError> for GameError {
    fn from(err: DbError) -> Self {
        Self::Storage(err)
    }
}
