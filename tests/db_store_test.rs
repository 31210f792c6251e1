//! Tests for the SQLite game store.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use tempfile::NamedTempFile;

use guess_the_number::{
    DbGameStore, GameEngine, GameStatus, GameStore, MatchResult, Round, StoreError,
};

/// Creates a temporary database file and an opened store on it. The file
/// handle must stay in scope to keep the file alive.
fn setup_test_db() -> (NamedTempFile, DbGameStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = DbGameStore::open(db_path).expect("Failed to open store");
    (db_file, store)
}

fn at(seconds: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("Invalid date")
        + Duration::seconds(seconds)
}

fn round(guess: &str, result: MatchResult, seconds: i64) -> Round {
    Round::new(guess.to_string(), result, at(seconds))
}

#[test]
fn test_create_and_get_game() {
    let (_db, store) = setup_test_db();
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");
    assert!(id > 0);

    let game = store.get_game(id).expect("Get failed");
    assert_eq!(*game.id(), id);
    assert_eq!(game.answer(), "1234");
    assert_eq!(*game.status(), GameStatus::InProgress);
}

#[test]
fn test_get_missing_game_fails_not_found() {
    let (_db, store) = setup_test_db();
    let err = store.get_game(42).expect_err("Should be missing");
    assert!(matches!(err, StoreError::GameNotFound(42)));
}

#[test]
fn test_list_games_in_id_order() {
    let (_db, store) = setup_test_db();
    assert!(store.list_games().expect("List failed").is_empty());

    let a = store
        .create_game("1111", GameStatus::InProgress)
        .expect("Create failed");
    let b = store
        .create_game("2222", GameStatus::Finished)
        .expect("Create failed");

    let games = store.list_games().expect("List failed");
    assert_eq!(games.len(), 2);
    assert_eq!(*games[0].id(), a);
    assert_eq!(*games[1].id(), b);
    assert_eq!(*games[1].status(), GameStatus::Finished);
}

#[test]
fn test_new_game_has_no_rounds() {
    let (_db, store) = setup_test_db();
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");
    assert!(store.list_rounds(id).expect("Rounds failed").is_empty());
}

#[test]
fn test_rounds_sorted_by_timestamp_on_read() {
    let (_db, store) = setup_test_db();
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");

    store
        .append_round(id, round("3333", MatchResult::new(1, 0), 300))
        .expect("Append failed");
    store
        .append_round(id, round("1111", MatchResult::new(1, 0), 100))
        .expect("Append failed");
    store
        .append_round(id, round("4321", MatchResult::new(0, 4), 200))
        .expect("Append failed");

    let rounds = store.list_rounds(id).expect("Rounds failed");
    let guesses: Vec<_> = rounds.iter().map(|r| r.guess().as_str()).collect();
    assert_eq!(guesses, ["1111", "4321", "3333"]);
    assert_eq!(*rounds[1].result(), MatchResult::new(0, 4));
    assert_eq!(*rounds[0].timestamp(), at(100));
}

#[test]
fn test_rounds_sorted_with_subsecond_timestamps() {
    let (_db, store) = setup_test_db();
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");

    let millis = |ms: i64| at(0) + Duration::milliseconds(ms);
    let appended = [("d", 10_000), ("b", 250), ("c", 1_500), ("a", 0)];
    for (guess, ms) in appended {
        let round = Round::new(guess.to_string(), MatchResult::default(), millis(ms));
        store.append_round(id, round).expect("Append failed");
    }

    let guesses: Vec<String> = store
        .list_rounds(id)
        .expect("Rounds failed")
        .iter()
        .map(|r| r.guess().clone())
        .collect();
    assert_eq!(guesses, ["a", "b", "c", "d"]);
}

#[test]
fn test_equal_timestamps_keep_append_order() {
    let (_db, store) = setup_test_db();
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");

    for guess in ["later", "first", "second"] {
        let seconds = if guess == "later" { 5 } else { 1 };
        store
            .append_round(id, round(guess, MatchResult::default(), seconds))
            .expect("Append failed");
    }

    let guesses: Vec<String> = store
        .list_rounds(id)
        .expect("Rounds failed")
        .iter()
        .map(|r| r.guess().clone())
        .collect();
    assert_eq!(guesses, ["first", "second", "later"]);
}

#[test]
fn test_db_path_is_kept() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = DbGameStore::open(db_path.clone()).expect("Failed to open store");
    assert_eq!(store.db_path(), db_path);
}

#[test]
fn test_rounds_are_per_game() {
    let (_db, store) = setup_test_db();
    let a = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");
    let b = store
        .create_game("5678", GameStatus::InProgress)
        .expect("Create failed");

    store
        .append_round(a, round("0000", MatchResult::new(0, 0), 0))
        .expect("Append failed");

    assert_eq!(store.list_rounds(a).expect("Rounds failed").len(), 1);
    assert!(store.list_rounds(b).expect("Rounds failed").is_empty());
}

#[test]
fn test_operations_on_missing_game_fail_not_found() {
    let (_db, store) = setup_test_db();
    assert!(store.list_rounds(7).expect_err("Missing").is_not_found());
    assert!(
        store
            .append_round(7, round("1234", MatchResult::new(0, 0), 0))
            .expect_err("Missing")
            .is_not_found()
    );
    assert!(
        store
            .set_status(7, GameStatus::Finished)
            .expect_err("Missing")
            .is_not_found()
    );
    assert!(store.delete_game(7).expect_err("Missing").is_not_found());
}

#[test]
fn test_set_status() {
    let (_db, store) = setup_test_db();
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");

    store
        .set_status(id, GameStatus::Finished)
        .expect("Update failed");
    assert_eq!(
        *store.get_game(id).expect("Get failed").status(),
        GameStatus::Finished
    );
}

#[test]
fn test_status_stored_as_progress_code() {
    let (db, store) = setup_test_db();
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");
    store
        .set_status(id, GameStatus::Finished)
        .expect("Update failed");

    let mut conn = SqliteConnection::establish(db.path().to_str().expect("Invalid path"))
        .expect("Failed to connect");
    #[derive(QueryableByName)]
    struct Code {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        progress_id: i32,
    }
    let code = diesel::sql_query("SELECT progress_id FROM game WHERE game_id = ?")
        .bind::<diesel::sql_types::Integer, _>(id)
        .get_result::<Code>(&mut conn)
        .expect("Query failed");
    assert_eq!(code.progress_id, GameStatus::Finished.progress_code());
}

#[test]
fn test_delete_removes_game_and_rounds_and_keeps_ids() {
    let (_db, store) = setup_test_db();
    let a = store
        .create_game("1111", GameStatus::InProgress)
        .expect("Create failed");
    let b = store
        .create_game("2222", GameStatus::InProgress)
        .expect("Create failed");
    store
        .append_round(a, round("1111", MatchResult::new(4, 0), 0))
        .expect("Append failed");

    store.delete_game(a).expect("Delete failed");

    assert!(store.get_game(a).is_err());
    assert!(store.list_rounds(a).is_err());
    assert_eq!(store.get_game(b).expect("Get failed").answer(), "2222");

    let c = store
        .create_game("3333", GameStatus::InProgress)
        .expect("Create failed");
    assert!(c > b, "Ids must not be reused after deletion");
}

#[test]
fn test_data_survives_reopen() {
    let (db, store) = setup_test_db();
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");
    store
        .append_round(id, round("1234", MatchResult::new(4, 0), 0))
        .expect("Append failed");
    drop(store);

    let reopened = DbGameStore::open(db.path().to_str().expect("Invalid path"))
        .expect("Reopen failed");
    assert_eq!(reopened.get_game(id).expect("Get failed").answer(), "1234");
    assert_eq!(reopened.list_rounds(id).expect("Rounds failed").len(), 1);
}

#[test]
fn test_in_memory_database() {
    let store = DbGameStore::open(":memory:").expect("Open failed");
    let id = store
        .create_game("1234", GameStatus::InProgress)
        .expect("Create failed");
    assert_eq!(store.get_game(id).expect("Get failed").answer(), "1234");
}

#[test]
fn test_engine_over_database() {
    let (_db, store) = setup_test_db();
    let engine = GameEngine::new(Arc::new(store));
    let id = engine
        .create_game(Some("1234".to_string()))
        .expect("Create failed");

    let round = engine
        .guess(id, "4321")
        .expect("Guess failed")
        .expect("Game missing");
    assert_eq!(round.result().to_string(), "e:0:p:4");

    engine.guess(id, "1234").expect("Guess failed");
    let game = engine.get_game(id).expect("Get failed").expect("Game missing");
    assert_eq!(*game.status(), GameStatus::Finished);

    let rounds = engine.get_rounds(id).expect("Rounds failed");
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].guess(), "4321");
    assert!(engine.guess(999, "1234").expect("Guess failed").is_none());
}
