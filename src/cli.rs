//! Command-line interface for guess_the_number.

use clap::{Parser, Subcommand};

use guess_the_number::{GameId, StoreBackend};

/// Guess the Number - score four-digit guesses against a secret answer
#[derive(Parser, Debug)]
#[command(name = "guess_the_number")]
#[command(about = "Guess-the-number game engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Store backend (overrides config and environment)
    #[arg(long, global = true, value_enum)]
    pub backend: Option<StoreBackend>,

    /// SQLite database path (overrides config and environment)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Begin a new game and print its id
    Begin {
        /// Use this answer instead of a random one
        #[arg(long)]
        answer: Option<String>,
    },

    /// Submit a guess for a game
    Guess {
        /// Game to guess against
        game_id: GameId,

        /// The guessed digits
        guess: String,
    },

    /// List all games
    Games,

    /// Show one game
    Game {
        /// Game to show
        game_id: GameId,
    },

    /// List the rounds played in a game
    Rounds {
        /// Game whose rounds to list
        game_id: GameId,
    },

    /// Delete a game and its rounds
    Delete {
        /// Game to delete
        game_id: GameId,
    },

    /// Play a game interactively on stdin
    Play {
        /// Use this answer instead of a random one
        #[arg(long)]
        answer: Option<String>,
    },
}
