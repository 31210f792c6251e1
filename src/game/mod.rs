//! Guess-the-number game model and engine.

mod engine;
mod error;
mod models;
mod view;

pub use engine::{ANSWER_LENGTH, GameEngine, generate_answer};
pub use error::EngineError;
pub(crate) use error::found;
pub use models::{GameId, GameInstance, GameStatus, Round};
pub use view::GameView;
