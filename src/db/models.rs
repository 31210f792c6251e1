//! Database row models and their mapping to domain types.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::game::{GameId, GameInstance, GameStatus, Round};
use crate::scoring::MatchResult;

/// Game database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game)]
#[diesel(primary_key(game_id))]
pub struct GameRow {
    game_id: i32,
    answer: String,
    progress_id: i32,
}

impl GameRow {
    /// Builds the domain game from this row and the joined progress description.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the description is not a known status.
    #[instrument(skip(self), fields(game_id = self.game_id))]
    pub fn into_instance(self, progress_desc: &str) -> Result<GameInstance, DbError> {
        let status = GameStatus::from_str(progress_desc).map_err(|_| {
            DbError::new(format!("Invalid progress description: '{}'", progress_desc))
        })?;
        Ok(GameInstance::new(self.game_id, self.answer, status))
    }
}

/// Insertable game model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::game)]
pub struct NewGameRow {
    answer: String,
    progress_id: i32,
}

/// Round database model.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::rounds)]
#[diesel(primary_key(round_id))]
#[diesel(belongs_to(GameRow, foreign_key = game_id))]
pub struct RoundRow {
    round_id: i32,
    game_id: i32,
    guess: String,
    result: String,
    round_time: NaiveDateTime,
}

impl RoundRow {
    /// Builds the domain round, parsing the stored result text.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored result is malformed.
    #[instrument(skip(self), fields(round_id = self.round_id, result = %self.result))]
    pub fn into_round(self) -> Result<Round, DbError> {
        let result = MatchResult::parse(&self.result)?;
        Ok(Round::new(self.guess, result, self.round_time))
    }
}

/// Insertable round model.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::rounds)]
pub struct NewRoundRow {
    game_id: i32,
    guess: String,
    result: String,
    round_time: NaiveDateTime,
}

impl NewRoundRow {
    /// Prepares a round of `game_id` for insertion.
    #[instrument(skip(round))]
    pub fn from_round(game_id: GameId, round: &Round) -> Self {
        Self::new(
            game_id,
            round.guess().clone(),
            round.result().to_string(),
            *round.timestamp(),
        )
    }
}
