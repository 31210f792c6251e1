//! Request-level game operations for front ends.

use tracing::{debug, info, instrument, warn};

use crate::game::{EngineError, GameEngine, GameId, GameView, Round};

/// Result of submitting a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess was scored and recorded.
    Accepted(Round),
    /// No game with that id.
    NotFound,
    /// The guess length does not match the answer.
    Invalid,
    /// The game is already finished and takes no more guesses.
    Locked,
}

/// Wraps [`GameEngine`] with the checks and view shaping a front end needs.
///
/// This is where finished games are locked against further guesses and
/// where answers are hidden from unfinished games.
#[derive(Debug)]
pub struct GameController {
    engine: GameEngine,
}

impl GameController {
    /// Creates a controller over the given engine.
    #[instrument(skip(engine))]
    pub fn new(engine: GameEngine) -> Self {
        info!("Creating GameController");
        Self { engine }
    }

    /// Returns the underlying engine.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Begins a new game.
    #[instrument(skip(self, answer))]
    pub fn begin(&self, answer: Option<String>) -> Result<GameId, EngineError> {
        let id = self.engine.create_game(answer)?;
        info!(game_id = id, "Game begun");
        Ok(id)
    }

    /// Submits a guess, refusing it if the game is already finished.
    #[instrument(skip(self, guess), fields(guess = %guess))]
    pub fn submit_guess(&self, game_id: GameId, guess: &str) -> Result<GuessOutcome, EngineError> {
        match self.engine.get_game(game_id)? {
            None => return Ok(GuessOutcome::NotFound),
            Some(game) if game.is_finished() => {
                warn!("Guess against finished game");
                return Ok(GuessOutcome::Locked);
            }
            Some(_) => {}
        }

        match self.engine.guess(game_id, guess) {
            Ok(Some(round)) => Ok(GuessOutcome::Accepted(round)),
            Ok(None) => Ok(GuessOutcome::NotFound),
            Err(EngineError::InvalidGuess { expected, .. }) => {
                debug!(expected, "Guess rejected");
                Ok(GuessOutcome::Invalid)
            }
            Err(err) => Err(err),
        }
    }

    /// Summaries of all games.
    #[instrument(skip(self))]
    pub fn games(&self) -> Result<Vec<GameView>, EngineError> {
        let games = self.engine.list_games()?;
        Ok(games.iter().map(GameView::from_instance).collect())
    }

    /// Summary of one game, or `None` if it does not exist.
    #[instrument(skip(self))]
    pub fn game(&self, game_id: GameId) -> Result<Option<GameView>, EngineError> {
        Ok(self
            .engine
            .get_game(game_id)?
            .as_ref()
            .map(GameView::from_instance))
    }

    /// Rounds of a game; empty if the game does not exist.
    #[instrument(skip(self))]
    pub fn rounds(&self, game_id: GameId) -> Result<Vec<Round>, EngineError> {
        self.engine.get_rounds(game_id)
    }
}
