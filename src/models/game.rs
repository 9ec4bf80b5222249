//! Game, GamePhase, events and errors.

use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during game operations. All leave the game unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameError {
    /// Fewer than two names were supplied.
    NotEnoughPlayers { given: usize },
    /// One of the supplied names is blank.
    EmptyPlayerName,
    /// Two players share a name (names are unique, case-insensitive).
    DuplicatePlayerName(String),
    /// Operation needs a game in progress.
    NotStarted,
    /// A game is in progress or ended; it must be reset before starting another.
    AlreadyStarted,
    /// Some active players have no entry for the current round.
    IncompleteRound { missing: Vec<String> },
    /// Point input could not be interpreted.
    InvalidInput(String),
    /// Another player already won this round.
    DuplicateWinner { round_num: u32 },
    PlayerNotFound(PlayerId),
    /// Round number is not an opened round.
    RoundOutOfRange { round_num: u32, current_round: u32 },
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::NotEnoughPlayers { given } => {
                write!(f, "Please add at least two players to start the game (got {})", given)
            }
            GameError::EmptyPlayerName => write!(f, "All player names must be filled out"),
            GameError::DuplicatePlayerName(name) => {
                write!(f, "A player named \"{}\" already exists", name)
            }
            GameError::NotStarted => write!(f, "Please start a new game first"),
            GameError::AlreadyStarted => {
                write!(f, "A game is already running; restart it before starting a new one")
            }
            GameError::IncompleteRound { missing } => write!(
                f,
                "Please fill in all points for the current round before adding a new one (missing: {})",
                missing.join(", ")
            ),
            GameError::InvalidInput(raw) => write!(
                f,
                "Invalid input \"{}\": enter a number, \"D\" for dropped, or \"W\" / \"0\" for winner",
                raw
            ),
            GameError::DuplicateWinner { round_num } => {
                write!(f, "Only one player can be the winner of round {}", round_num)
            }
            GameError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            GameError::RoundOutOfRange {
                round_num,
                current_round,
            } => write!(
                f,
                "Round {} does not exist (current round is {})",
                round_num, current_round
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Broad category of a [`GameError`], for callers that only care about the class of mistake.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameErrorKind {
    /// Bad start-game input (player names).
    Validation,
    /// Operation not allowed in the current phase.
    State,
    IncompleteRound,
    /// Unusable cell input: unparseable value, unknown player or round.
    InvalidInput,
    DuplicateWinner,
}

impl GameError {
    pub fn kind(&self) -> GameErrorKind {
        match self {
            GameError::NotEnoughPlayers { .. }
            | GameError::EmptyPlayerName
            | GameError::DuplicatePlayerName(_) => GameErrorKind::Validation,
            GameError::NotStarted | GameError::AlreadyStarted => GameErrorKind::State,
            GameError::IncompleteRound { .. } => GameErrorKind::IncompleteRound,
            GameError::InvalidInput(_)
            | GameError::PlayerNotFound(_)
            | GameError::RoundOutOfRange { .. } => GameErrorKind::InvalidInput,
            GameError::DuplicateWinner { .. } => GameErrorKind::DuplicateWinner,
        }
    }
}

/// Unique identifier for a game (one per browser session).
pub type GameId = Uuid;

/// Phase of the game.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Entering player names.
    #[default]
    NotStarted,
    /// Rounds are being played.
    InProgress,
    /// At most one active player is left; winner declared.
    Ended,
}

/// The declared winner of an ended game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub player_id: PlayerId,
    pub name: String,
    pub total: u32,
}

/// Notifications produced by scoring (shown to the players as messages).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerEliminated {
        player_id: PlayerId,
        name: String,
        total: u32,
    },
    GameEnded {
        winner: Winner,
    },
}

/// Full game state: players, round counter, timing and phase.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub id: GameId,
    /// Fixed at start, in name-entry order.
    pub players: Vec<Player>,
    /// Number of opened rounds (0 before the first round).
    pub current_round: u32,
    pub phase: GamePhase,
    /// When the game was started (elapsed-time readout).
    pub started_at: Option<DateTime<Utc>>,
    /// Start time of each round; index i holds round i + 1.
    pub round_start_times: Vec<DateTime<Utc>>,
    /// When the game ended; the clocks stop here.
    pub ended_at: Option<DateTime<Utc>>,
    /// Set when the game ends.
    pub winner: Option<Winner>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create an empty game in NotStarted phase.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Empty game with a known id (e.g. the one stored in a session).
    pub fn with_id(id: GameId) -> Self {
        Self {
            id,
            players: Vec::new(),
            current_round: 0,
            phase: GamePhase::NotStarted,
            started_at: None,
            round_start_times: Vec::new(),
            ended_at: None,
            winner: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.phase == GamePhase::InProgress
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Players not yet eliminated, in start order.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_out)
    }

    /// Recompute every player's total from their round entries.
    pub fn recompute_totals(&mut self) {
        for p in &mut self.players {
            p.recompute_total();
        }
    }

    /// Player currently marked as the winner of a round, if any.
    pub fn round_winner(&self, round_num: u32) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.entry(round_num).is_some_and(|e| e.result.is_win()))
    }
}
