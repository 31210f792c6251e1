//! Guess the Number - command-line front end.

#![warn(missing_docs)]

mod cli;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use guess_the_number::{
    AppConfig, GameController, GameEngine, GameId, GuessOutcome, StoreError,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "guess_the_number.toml";

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let store = config.open_store().context("Failed to open game store")?;
    let controller = GameController::new(GameEngine::new(store));

    match cli.command {
        Command::Begin { answer } => begin(&controller, answer),
        Command::Guess { game_id, guess } => submit(&controller, game_id, &guess),
        Command::Games => print_json(&controller.games()?),
        Command::Game { game_id } => match controller.game(game_id)? {
            Some(view) => print_json(&view),
            None => bail!("Game {} not found", game_id),
        },
        Command::Rounds { game_id } => print_json(&controller.rounds(game_id)?),
        Command::Delete { game_id } => delete(&controller, game_id),
        Command::Play { answer } => play(&controller, answer),
    }
}

/// Builds the configuration: defaults, config file, environment, then flags.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => AppConfig::from_file(DEFAULT_CONFIG_FILE)?,
        None => AppConfig::default(),
    };

    config.apply_env()?;

    if let Some(backend) = cli.backend {
        config.set_backend(backend);
    }
    if let Some(db_path) = &cli.db_path {
        config.set_database_path(db_path.clone());
    }

    debug!(?config, "Configuration resolved");
    Ok(config)
}

/// Rejects supplied answers that are not all digits.
fn check_answer(answer: Option<String>) -> Result<Option<String>> {
    if let Some(answer) = &answer
        && (answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()))
    {
        bail!("Answer must be a non-empty string of digits");
    }
    Ok(answer)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Created {
    game_id: GameId,
}

#[instrument(skip(controller, answer))]
fn begin(controller: &GameController, answer: Option<String>) -> Result<()> {
    let game_id = controller.begin(check_answer(answer)?)?;
    print_json(&Created { game_id })
}

#[instrument(skip(controller))]
fn submit(controller: &GameController, game_id: GameId, guess: &str) -> Result<()> {
    match controller.submit_guess(game_id, guess)? {
        GuessOutcome::Accepted(round) => print_json(&round),
        GuessOutcome::NotFound => bail!("Game {} not found", game_id),
        GuessOutcome::Invalid => bail!("Invalid guess \"{}\"", guess),
        GuessOutcome::Locked => bail!("Game {} is already finished", game_id),
    }
}

#[instrument(skip(controller))]
fn delete(controller: &GameController, game_id: GameId) -> Result<()> {
    match controller.engine().store().delete_game(game_id) {
        Ok(()) => {
            info!(game_id, "Game deleted");
            Ok(())
        }
        Err(StoreError::GameNotFound(_)) => bail!("Game {} not found", game_id),
        Err(err) => Err(err.into()),
    }
}

/// Begins a game and reads guesses from stdin until it is solved.
#[instrument(skip(controller, answer))]
fn play(controller: &GameController, answer: Option<String>) -> Result<()> {
    let game_id = controller.begin(check_answer(answer)?)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Game {} started. Enter your guesses:", game_id)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let guess = line.trim();
        if guess.is_empty() {
            continue;
        }

        match controller.submit_guess(game_id, guess)? {
            GuessOutcome::Accepted(round) => {
                writeln!(stdout, "{}", round.result())?;
                if round.result().is_full_match(guess.chars().count()) {
                    let rounds = controller.rounds(game_id)?.len();
                    writeln!(stdout, "Solved in {} rounds!", rounds)?;
                    return Ok(());
                }
            }
            GuessOutcome::Invalid => {
                warn!(guess, "Invalid guess");
                writeln!(stdout, "Guesses must have the same length as the answer")?;
            }
            GuessOutcome::NotFound => bail!("Game {} disappeared", game_id),
            GuessOutcome::Locked => bail!("Game {} is already finished", game_id),
        }
        stdout.flush()?;
    }

    writeln!(stdout, "Gave up on game {}", game_id)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use guess_the_number::MemoryGameStore;

    use super::*;

    fn memory_controller() -> GameController {
        GameController::new(GameEngine::new(Arc::new(MemoryGameStore::new())))
    }

    #[test]
    fn test_guess_command_submits_to_game() {
        let controller = memory_controller();
        let id = controller
            .begin(Some("1234".to_string()))
            .expect("Begin failed");

        let cli = Cli::try_parse_from(["guess_the_number", "guess", &id.to_string(), "1234"])
            .expect("Parse failed");
        let Command::Guess { game_id, guess } = cli.command else {
            panic!("Expected guess command");
        };
        assert_eq!(game_id, id);

        submit(&controller, game_id, &guess).expect("Submit failed");
        let rounds = controller.rounds(id).expect("Rounds failed");
        assert_eq!(rounds.len(), 1);
        assert!(matches!(
            submit(&controller, game_id, &guess),
            Err(err) if err.to_string().contains("already finished")
        ));
    }

    #[test]
    fn test_submit_unknown_game_fails() {
        let controller = memory_controller();
        assert!(submit(&controller, 99, "1234").is_err());
    }
}
