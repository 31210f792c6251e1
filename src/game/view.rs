//! Outward-facing game summaries.
//!
//! The answer of a game stays hidden until the game is finished.

use serde::Serialize;
use tracing::instrument;

use super::{GameId, GameInstance, GameStatus};

/// Read-only summary of a game, shaped by its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GameView {
    /// Game still running: no answer.
    #[serde(rename_all = "camelCase")]
    InProgress {
        /// Game identifier.
        game_id: GameId,
        /// Always [`GameStatus::InProgress`].
        status: GameStatus,
    },
    /// Game solved: answer revealed.
    #[serde(rename_all = "camelCase")]
    Finished {
        /// Game identifier.
        game_id: GameId,
        /// The solved answer.
        answer: String,
        /// Always [`GameStatus::Finished`].
        status: GameStatus,
    },
}

impl GameView {
    /// Selects the view for a game purely from its status.
    #[instrument(skip(game), fields(game_id = game.id(), status = %game.status()))]
    pub fn from_instance(game: &GameInstance) -> Self {
        match game.status() {
            GameStatus::InProgress => Self::InProgress {
                game_id: *game.id(),
                status: GameStatus::InProgress,
            },
            GameStatus::Finished => Self::Finished {
                game_id: *game.id(),
                answer: game.answer().clone(),
                status: GameStatus::Finished,
            },
        }
    }

    /// Identifier of the summarised game.
    pub fn game_id(&self) -> GameId {
        match self {
            Self::InProgress { game_id, .. } | Self::Finished { game_id, .. } => *game_id,
        }
    }

    /// The answer, if this view is allowed to show it.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::InProgress { .. } => None,
            Self::Finished { answer, .. } => Some(answer),
        }
    }
}

impl From<&GameInstance> for GameView {
    fn from(game: &GameInstance) -> Self {
        Self::from_instance(game)
    }
}
