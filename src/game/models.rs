//! Game and round domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::instrument;

use crate::scoring::MatchResult;

/// Identifier of a stored game.
pub type GameId = i32;

/// Lifecycle status of a game.
///
/// A game starts [`GameStatus::InProgress`] and moves to
/// [`GameStatus::Finished`] once, on its first full match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Guesses are still being accepted.
    InProgress,
    /// The answer has been guessed.
    Finished,
}

impl GameStatus {
    /// Stable lookup code used by the `progress` table.
    #[instrument]
    pub fn progress_code(&self) -> i32 {
        match self {
            Self::InProgress => 1,
            Self::Finished => 2,
        }
    }

    /// Maps a `progress` lookup code back to a status.
    #[instrument]
    pub fn from_progress_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::InProgress),
            2 => Some(Self::Finished),
            _ => None,
        }
    }
}

/// A single game: its answer and where it is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameInstance {
    id: GameId,
    answer: String,
    status: GameStatus,
}

impl GameInstance {
    /// Returns `true` once the answer has been guessed.
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }
}

/// One scored guess recorded against a game. Rounds never change once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Round {
    /// The guessed digits.
    guess: String,
    /// Score of the guess, serialized as `e:<exact>:p:<partial>`.
    #[serde(rename = "guessResult")]
    result: MatchResult,
    /// When the round was recorded; the only ordering key for history.
    timestamp: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_status_text_form() {
        assert_eq!(GameStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(GameStatus::Finished.to_string(), "FINISHED");
        assert_eq!(
            GameStatus::from_str("FINISHED").expect("parse"),
            GameStatus::Finished
        );
        assert!(GameStatus::from_str("DONE").is_err());
    }

    #[test]
    fn test_progress_code_round_trip() {
        for status in GameStatus::iter() {
            assert_eq!(
                GameStatus::from_progress_code(status.progress_code()),
                Some(status)
            );
        }
        assert_eq!(GameStatus::from_progress_code(0), None);
    }

    #[test]
    fn test_round_json_shape() {
        let timestamp = NaiveDateTime::parse_from_str("2024-03-01 10:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("timestamp");
        let round = Round::new("1234".to_string(), MatchResult::new(4, 0), timestamp);
        let json = serde_json::to_value(&round).expect("serialize");
        assert_eq!(json["guess"], "1234");
        assert_eq!(json["guessResult"], "e:4:p:0");
        assert_eq!(json["timestamp"], "2024-03-01T10:00:00");
    }
}
