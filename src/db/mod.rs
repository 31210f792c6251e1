//! SQLite persistence for games and rounds.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{GameRow, NewGameRow, NewRoundRow, RoundRow};
pub use repository::DbGameStore;
