//! Persistence: game snapshots as JSON, one file per game.
//!
//! The store is a convenience cache so a reload resumes the same game. Loading is tolerant:
//! missing ids, totals, out flags and round slots are repaired from what is present.

use crate::constants::ELIMINATION_THRESHOLD;
use crate::logic::{check_elimination, determine_winner};
use crate::models::{Game, GameId, GamePhase, Player, PlayerId, RoundEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Errors from reading or writing snapshots.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "snapshot i/o error: {}", e),
            StorageError::Json(e) => write!(f, "snapshot format error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// A player as stored. Derived fields are optional and rebuilt on load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub id: Option<PlayerId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_points: Option<u32>,
    #[serde(default)]
    pub is_out: Option<bool>,
    #[serde(default)]
    pub rounds: Vec<RoundEntry>,
}

/// Serializable game state sufficient to resume play.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(default)]
    pub id: Option<GameId>,
    #[serde(default)]
    pub players: Vec<PlayerSnapshot>,
    #[serde(default)]
    pub game_started: bool,
    #[serde(default)]
    pub current_round: u32,
    #[serde(default)]
    pub round_start_times: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<&Game> for GameSnapshot {
    fn from(game: &Game) -> Self {
        Self {
            id: Some(game.id),
            players: game
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    id: Some(p.id),
                    name: p.name.clone(),
                    total_points: Some(p.total_points),
                    is_out: Some(p.is_out),
                    rounds: p.rounds.clone(),
                })
                .collect(),
            game_started: game.is_started(),
            current_round: game.current_round,
            round_start_times: game.round_start_times.clone(),
            started_at: game.started_at,
            ended_at: game.ended_at,
        }
    }
}

impl GameSnapshot {
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a game, repairing whatever the snapshot is missing.
    ///
    /// 1. If any player lacks an id, or two share one, every player gets their position.
    /// 2. Totals are recomputed from round entries.
    /// 3. `isOut` defaults to false and is forced true at or over the threshold.
    /// 4. Short round lists are padded up to the round count (out entries for eliminated players).
    /// 5. Phase: in progress if started, ended if rounds were played, otherwise not started.
    pub fn into_game(self, fallback_id: GameId) -> Game {
        let mut game = Game::with_id(self.id.unwrap_or(fallback_id));

        let longest = self
            .players
            .iter()
            .map(|p| p.rounds.len() as u32)
            .max()
            .unwrap_or(0);
        let current_round = self.current_round.max(longest);

        let mut seen = HashSet::new();
        let ids_usable = self
            .players
            .iter()
            .all(|p| p.id.is_some_and(|id| seen.insert(id)));

        game.players = self
            .players
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let id = match s.id {
                    Some(id) if ids_usable => id,
                    _ => i as PlayerId,
                };
                repair_player(i, id, s, current_round)
            })
            .collect();
        game.current_round = if game.players.is_empty() { 0 } else { current_round };
        game.round_start_times = self.round_start_times;
        game.started_at = self.started_at;
        game.ended_at = self.ended_at;

        game.phase = if game.players.is_empty() {
            GamePhase::NotStarted
        } else if self.game_started {
            GamePhase::InProgress
        } else if game.current_round > 0 {
            GamePhase::Ended
        } else {
            GamePhase::NotStarted
        };

        match game.phase {
            GamePhase::InProgress => {
                // A saved game may already satisfy the end condition.
                check_elimination(&mut game);
            }
            GamePhase::Ended => {
                game.winner = determine_winner(&game);
                // Older snapshots have no end time; stop the clock at the last round start.
                if game.ended_at.is_none() {
                    game.ended_at = game.round_start_times.last().copied();
                }
            }
            GamePhase::NotStarted => game.ended_at = None,
        }
        game
    }
}

fn repair_player(index: usize, id: PlayerId, s: PlayerSnapshot, current_round: u32) -> Player {
    let name = if s.name.trim().is_empty() {
        format!("Player {}", index + 1)
    } else {
        s.name
    };
    let mut player = Player::new(id, name);
    player.rounds = s.rounds;
    player.recompute_total();
    player.is_out = s.is_out.unwrap_or(false) || player.total_points >= ELIMINATION_THRESHOLD;
    while (player.rounds.len() as u32) < current_round {
        let n = player.rounds.len() as u32 + 1;
        player.open_round(n);
    }
    player
}

/// Load/save interface the web layer calls after every mutation.
pub trait SnapshotStore: Send + Sync {
    /// Load a game, or None if nothing was saved under this id.
    fn load(&self, id: GameId) -> Result<Option<Game>, StorageError>;
    fn save(&self, game: &Game) -> Result<(), StorageError>;
    fn remove(&self, id: GameId) -> Result<(), StorageError>;
}

/// Stores each game as `<dir>/<id>.json`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: GameId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self, id: GameId) -> Result<Option<Game>, StorageError> {
        let json = match fs::read_to_string(self.path_for(id)) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = GameSnapshot::from_json(&json)?;
        Ok(Some(snapshot.into_game(id)))
    }

    fn save(&self, game: &Game) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let json = GameSnapshot::from(game).to_json()?;
        // Write to a temp file, then rename over the snapshot.
        let tmp = self.dir.join(format!("{}.json.tmp", game.id));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.path_for(game.id))?;
        Ok(())
    }

    fn remove(&self, id: GameId) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(id)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Save a game, logging (not returning) any failure. Gameplay never depends on the store.
pub fn save_or_log(store: &dyn SnapshotStore, game: &Game) {
    if let Err(e) = store.save(game) {
        log::warn!("Could not save game {}: {}", game.id, e);
    }
}
