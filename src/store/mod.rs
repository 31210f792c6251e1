//! Storage abstraction for games and their round history.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryGameStore;

use crate::game::{GameId, GameInstance, GameStatus, Round};

/// Create/read/update/delete of games and their rounds.
///
/// Every operation that names a game fails with
/// [`StoreError::GameNotFound`] when that game is not stored. Status
/// changes are not validated here; the engine owns the transition rules.
pub trait GameStore: Send + Sync {
    /// All stored games. Order is stable per game.
    fn list_games(&self) -> Result<Vec<GameInstance>, StoreError>;

    /// The game with the given id.
    fn get_game(&self, id: GameId) -> Result<GameInstance, StoreError>;

    /// Rounds of a game, ascending by timestamp.
    fn list_rounds(&self, game_id: GameId) -> Result<Vec<Round>, StoreError>;

    /// Stores a new game with an empty round history and returns its fresh id.
    fn create_game(&self, answer: &str, status: GameStatus) -> Result<GameId, StoreError>;

    /// Appends a round to a game's history.
    fn append_round(&self, game_id: GameId, round: Round) -> Result<(), StoreError>;

    /// Overwrites a game's status.
    fn set_status(&self, game_id: GameId, status: GameStatus) -> Result<(), StoreError>;

    /// Removes a game together with all of its rounds.
    fn delete_game(&self, game_id: GameId) -> Result<(), StoreError>;
}
