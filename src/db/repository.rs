//! SQLite-backed game store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameRow, NewGameRow, NewRoundRow, RoundRow, schema};
use crate::game::{GameId, GameInstance, GameStatus, Round};
use crate::store::{GameStore, StoreError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Durable [`GameStore`] on a SQLite database.
///
/// Status is stored as a code referencing the `progress` lookup table. Game
/// ids are database keys and stay stable across deletions. One connection is
/// shared behind a lock, so `":memory:"` databases work and writes are
/// serialized.
pub struct DbGameStore {
    db_path: String,
    conn: Mutex<SqliteConnection>,
}

impl std::fmt::Debug for DbGameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbGameStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl DbGameStore {
    /// Opens the database at `db_path` and applies pending migrations.
    ///
    /// Use `":memory:"` for a throwaway database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(db_path))]
    pub fn open(db_path: impl Into<String>) -> Result<Self, DbError> {
        let db_path = db_path.into();
        info!(path = %db_path, "Opening DbGameStore");

        let mut conn = SqliteConnection::establish(&db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", db_path, e)))?;

        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        debug!(count = applied.len(), "Migrations applied");

        Ok(Self {
            db_path,
            conn: Mutex::new(conn),
        })
    }

    /// Path the store was opened with.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Borrows the shared connection.
    fn connection(&self) -> MutexGuard<'_, SqliteConnection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn find_game(conn: &mut SqliteConnection, id: GameId) -> Result<GameInstance, StoreError> {
        let row = schema::game::table
            .inner_join(schema::progress::table)
            .filter(schema::game::game_id.eq(id))
            .select((GameRow::as_select(), schema::progress::progress_desc))
            .first::<(GameRow, String)>(conn)
            .optional()?;

        match row {
            Some((game, desc)) => Ok(game.into_instance(&desc)?),
            None => {
                debug!(game_id = id, "Game not found");
                Err(StoreError::GameNotFound(id))
            }
        }
    }
}

impl GameStore for DbGameStore {
    #[instrument(skip(self))]
    fn list_games(&self) -> Result<Vec<GameInstance>, StoreError> {
        let mut conn = self.connection();

        let rows = schema::game::table
            .inner_join(schema::progress::table)
            .select((GameRow::as_select(), schema::progress::progress_desc))
            .order(schema::game::game_id.asc())
            .load::<(GameRow, String)>(&mut *conn)?;

        let games = rows
            .into_iter()
            .map(|(game, desc)| game.into_instance(&desc))
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = games.len(), "Games loaded");
        Ok(games)
    }

    #[instrument(skip(self))]
    fn get_game(&self, id: GameId) -> Result<GameInstance, StoreError> {
        let mut conn = self.connection();
        Self::find_game(&mut *conn, id)
    }

    #[instrument(skip(self))]
    fn list_rounds(&self, game_id: GameId) -> Result<Vec<Round>, StoreError> {
        let mut conn = self.connection();
        Self::find_game(&mut *conn, game_id)?;

        let rows = schema::rounds::table
            .filter(schema::rounds::game_id.eq(game_id))
            .order((
                schema::rounds::round_time.asc(),
                schema::rounds::round_id.asc(),
            ))
            .select(RoundRow::as_select())
            .load::<RoundRow>(&mut *conn)?;

        let rounds = rows
            .into_iter()
            .map(RoundRow::into_round)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = rounds.len(), "Rounds loaded");
        Ok(rounds)
    }

    #[instrument(skip(self, answer))]
    fn create_game(&self, answer: &str, status: GameStatus) -> Result<GameId, StoreError> {
        let mut conn = self.connection();

        let new_game = NewGameRow::new(answer.to_string(), status.progress_code());
        let id = diesel::insert_into(schema::game::table)
            .values(&new_game)
            .returning(schema::game::game_id)
            .get_result::<i32>(&mut *conn)?;

        info!(game_id = id, "Game stored");
        Ok(id)
    }

    #[instrument(skip(self, round), fields(guess = %round.guess()))]
    fn append_round(&self, game_id: GameId, round: Round) -> Result<(), StoreError> {
        let mut conn = self.connection();
        Self::find_game(&mut *conn, game_id)?;

        let new_round = NewRoundRow::from_round(game_id, &round);
        diesel::insert_into(schema::rounds::table)
            .values(&new_round)
            .execute(&mut *conn)?;

        debug!("Round appended");
        Ok(())
    }

    #[instrument(skip(self))]
    fn set_status(&self, game_id: GameId, status: GameStatus) -> Result<(), StoreError> {
        let mut conn = self.connection();

        let updated = diesel::update(schema::game::table.find(game_id))
            .set(schema::game::progress_id.eq(status.progress_code()))
            .execute(&mut *conn)?;

        if updated == 0 {
            debug!(game_id, "Game not found");
            return Err(StoreError::GameNotFound(game_id));
        }

        debug!("Status updated");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_game(&self, game_id: GameId) -> Result<(), StoreError> {
        let mut conn = self.connection();

        conn.transaction::<_, StoreError, _>(|conn| {
            let rounds = diesel::delete(
                schema::rounds::table.filter(schema::rounds::game_id.eq(game_id)),
            )
            .execute(conn)?;

            let games = diesel::delete(schema::game::table.find(game_id)).execute(conn)?;
            if games == 0 {
                warn!(game_id, "Delete of unknown game");
                return Err(StoreError::GameNotFound(game_id));
            }

            info!(game_id, rounds, "Game deleted");
            Ok(())
        })
    }
}
