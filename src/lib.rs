//! Guess the Number library - game engine with pluggable storage
//!
//! A game holds a secret string of digits. Each guess is scored for exact
//! and partial matches, recorded as a round, and the game finishes on the
//! first full match.
//!
//! # Architecture
//!
//! - **Scoring**: pure match counting and the `e:<exact>:p:<partial>` format
//! - **Store**: [`GameStore`] trait with in-memory and SQLite backends
//! - **Engine**: answer generation, guess validation, status transitions
//! - **Controller**: locking of finished games and answer-hiding views
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use guess_the_number::{GameEngine, GameStatus, MemoryGameStore};
//!
//! # fn example() -> Result<(), guess_the_number::EngineError> {
//! let engine = GameEngine::new(Arc::new(MemoryGameStore::new()));
//! let id = engine.create_game(Some("1234".to_string()))?;
//!
//! let round = engine.guess(id, "1243")?.expect("game exists");
//! assert_eq!(round.result().to_string(), "e:2:p:2");
//!
//! engine.guess(id, "1234")?;
//! let game = engine.get_game(id)?.expect("game exists");
//! assert_eq!(*game.status(), GameStatus::Finished);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod controller;
mod db;
mod game;
mod scoring;
mod store;

// Crate-level exports - Configuration
pub use config::{AppConfig, BACKEND_ENV, ConfigError, DATABASE_PATH_ENV, StoreBackend};

// Crate-level exports - Controller
pub use controller::{GameController, GuessOutcome};

// Crate-level exports - Persistence
pub use db::{DbError, DbGameStore, GameRow, NewGameRow, NewRoundRow, RoundRow};

// Crate-level exports - Game model and engine
pub use game::{
    ANSWER_LENGTH, EngineError, GameEngine, GameId, GameInstance, GameStatus, GameView, Round,
    generate_answer,
};

// Crate-level exports - Scoring
pub use scoring::{MatchResult, ScoreParseError, score};

// Crate-level exports - Storage abstraction
pub use store::{GameStore, MemoryGameStore, StoreError};
