//! Rummy score tracker: library with the score engine, persistence and export.

pub mod constants;
pub mod export;
pub mod logic;
pub mod models;
pub mod storage;

pub use constants::{DANGER_ZONE_POINTS, DROPPED_POINTS, ELIMINATION_THRESHOLD, MIN_PLAYERS};
pub use logic::{
    add_round, add_round_at, check_elimination, determine_winner, format_elapsed,
    format_round_duration, game_elapsed, parse_points, record_points, reset_game, round_durations,
    start_game, start_game_in,
};
pub use models::{
    EntryStatus, Game, GameError, GameErrorKind, GameEvent, GameId, GamePhase, Player, PlayerId, RoundEntry,
    RoundResult, Standing, Winner,
};
pub use storage::{GameSnapshot, JsonFileStore, SnapshotStore, StorageError};
