//! Process-lifetime game store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument, warn};

use super::{GameStore, StoreError};
use crate::game::{GameId, GameInstance, GameStatus, Round};

#[derive(Debug)]
struct MemoryState {
    next_id: GameId,
    games: BTreeMap<GameId, GameInstance>,
    rounds: HashMap<GameId, Vec<Round>>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            next_id: 1,
            games: BTreeMap::new(),
            rounds: HashMap::new(),
        }
    }
}

impl MemoryState {
    fn check(&self, id: GameId) -> Result<(), StoreError> {
        if self.games.contains_key(&id) {
            Ok(())
        } else {
            debug!(game_id = id, "Game not found");
            Err(StoreError::GameNotFound(id))
        }
    }
}

/// In-memory [`GameStore`].
///
/// Ids come from a counter and are never reused, so deleting a game leaves
/// every other id untouched. All operations run under one store-wide lock.
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    state: Mutex<MemoryState>,
}

impl MemoryGameStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating MemoryGameStore");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // Every mutation completes before the guard drops, so a poisoned
        // state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GameStore for MemoryGameStore {
    #[instrument(skip(self))]
    fn list_games(&self) -> Result<Vec<GameInstance>, StoreError> {
        let state = self.lock();
        let games: Vec<_> = state.games.values().cloned().collect();
        debug!(count = games.len(), "Listed games");
        Ok(games)
    }

    #[instrument(skip(self))]
    fn get_game(&self, id: GameId) -> Result<GameInstance, StoreError> {
        let state = self.lock();
        state
            .games
            .get(&id)
            .cloned()
            .ok_or(StoreError::GameNotFound(id))
    }

    #[instrument(skip(self))]
    fn list_rounds(&self, game_id: GameId) -> Result<Vec<Round>, StoreError> {
        let state = self.lock();
        state.check(game_id)?;

        let mut rounds = state.rounds.get(&game_id).cloned().unwrap_or_default();
        rounds.sort_by_key(|round| *round.timestamp());
        debug!(count = rounds.len(), "Listed rounds");
        Ok(rounds)
    }

    #[instrument(skip(self, answer))]
    fn create_game(&self, answer: &str, status: GameStatus) -> Result<GameId, StoreError> {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;

        state
            .games
            .insert(id, GameInstance::new(id, answer.to_string(), status));
        state.rounds.insert(id, Vec::new());

        info!(game_id = id, "Game stored");
        Ok(id)
    }

    #[instrument(skip(self, round), fields(guess = %round.guess()))]
    fn append_round(&self, game_id: GameId, round: Round) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.check(game_id)?;
        state.rounds.entry(game_id).or_default().push(round);
        debug!("Round appended");
        Ok(())
    }

    #[instrument(skip(self))]
    fn set_status(&self, game_id: GameId, status: GameStatus) -> Result<(), StoreError> {
        let mut state = self.lock();
        let game = state
            .games
            .get_mut(&game_id)
            .ok_or(StoreError::GameNotFound(game_id))?;
        game.set_status(status);
        debug!("Status updated");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_game(&self, game_id: GameId) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.games.remove(&game_id).is_none() {
            warn!(game_id, "Delete of unknown game");
            return Err(StoreError::GameNotFound(game_id));
        }
        state.rounds.remove(&game_id);
        info!(game_id, "Game deleted");
        Ok(())
    }
}
