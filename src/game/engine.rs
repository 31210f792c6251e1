//! Game orchestration: answer generation, guessing, status transitions.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, info, instrument, warn};

use super::found;
use super::{EngineError, GameId, GameInstance, GameStatus, Round};
use crate::db::DbError;
use crate::scoring;
use crate::store::GameStore;

/// Number of digits in a generated answer.
pub const ANSWER_LENGTH: usize = 4;

/// Draws an answer of [`ANSWER_LENGTH`] pairwise-distinct digits.
///
/// Each position draws from 0-9 and redraws until it finds a digit not yet
/// used.
#[instrument(skip(rng))]
pub fn generate_answer<R: Rng>(rng: &mut R) -> String {
    let mut used = HashSet::with_capacity(ANSWER_LENGTH);
    let mut answer = String::with_capacity(ANSWER_LENGTH);

    while answer.len() < ANSWER_LENGTH {
        let digit: u32 = rng.random_range(0..10);
        if used.insert(digit) {
            // Always a valid digit for radix 10.
            answer.extend(char::from_digit(digit, 10));
        }
    }

    answer
}

/// Runs guess-the-number games on top of a [`GameStore`].
///
/// Lookups are tolerant: a game that does not exist yields `None` or an
/// empty list, never an error. The engine does not refuse guesses on
/// finished games; callers that care must check the status first.
pub struct GameEngine {
    store: Arc<dyn GameStore>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine").finish_non_exhaustive()
    }
}

impl GameEngine {
    /// Creates an engine whose random answers come from an OS-seeded generator.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self::with_rng(store, StdRng::from_os_rng())
    }

    /// Creates an engine with an explicit random source.
    #[instrument(skip(store, rng))]
    pub fn with_rng(store: Arc<dyn GameStore>, rng: impl RngCore + Send + 'static) -> Self {
        info!("Creating GameEngine");
        Self {
            store,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// The store backing this engine.
    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    /// Starts a game, generating an answer when none is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the store fails.
    #[instrument(skip(self, answer), fields(supplied = answer.is_some()))]
    pub fn create_game(&self, answer: Option<String>) -> Result<GameId, EngineError> {
        let answer = match answer {
            Some(answer) => answer,
            None => {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                generate_answer(&mut *rng)
            }
        };

        let Some(id) = found(self.store.create_game(&answer, GameStatus::InProgress))? else {
            warn!("Store reported a missing game while creating one");
            return Err(EngineError::Storage(DbError::new(
                "Store did not return an id for the new game",
            )));
        };
        info!(game_id = id, "Game created");
        Ok(id)
    }

    /// Scores a guess, records it as a round and finishes the game on a full
    /// match.
    ///
    /// Returns `Ok(None)` if the game does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGuess`] if the guess length differs from
    /// the answer length; nothing is recorded in that case.
    #[instrument(skip(self, guess), fields(guess = %guess))]
    pub fn guess(&self, game_id: GameId, guess: &str) -> Result<Option<Round>, EngineError> {
        let Some(game) = found(self.store.get_game(game_id))? else {
            debug!("Guess for unknown game");
            return Ok(None);
        };

        let expected = game.answer().chars().count();
        if guess.chars().count() != expected {
            warn!(expected, "Guess length does not match answer");
            return Err(EngineError::InvalidGuess {
                guess: guess.to_string(),
                expected,
            });
        }

        let result = scoring::score(guess, game.answer());
        let round = Round::new(guess.to_string(), result, Utc::now().naive_utc());

        if found(self.store.append_round(game_id, round.clone()))?.is_none() {
            debug!("Game vanished before round was recorded");
            return Ok(None);
        }
        info!(result = %result, "Round recorded");

        if result.is_full_match(expected) {
            if found(self.store.set_status(game_id, GameStatus::Finished))?.is_none() {
                debug!("Game vanished before it could be finished");
                return Ok(None);
            }
            info!("Game finished");
        }

        Ok(Some(round))
    }

    /// All stored games.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the store fails.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameInstance>, EngineError> {
        Ok(found(self.store.list_games())?.unwrap_or_default())
    }

    /// The game with this id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the store fails.
    #[instrument(skip(self))]
    pub fn get_game(&self, game_id: GameId) -> Result<Option<GameInstance>, EngineError> {
        found(self.store.get_game(game_id))
    }

    /// Rounds of a game in timestamp order; empty if the game does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if the store fails.
    #[instrument(skip(self))]
    pub fn get_rounds(&self, game_id: GameId) -> Result<Vec<Round>, EngineError> {
        Ok(found(self.store.list_rounds(game_id))?.unwrap_or_default())
    }
}
