//! RoundEntry and RoundResult: one player's outcome for one round.

use crate::constants::DROPPED_POINTS;
use serde::{Deserialize, Serialize};

/// Outcome a player recorded for a round.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RoundResult {
    /// Nothing entered yet.
    #[default]
    Unset,
    /// Explicit numeric points.
    Normal(u32),
    /// Declared the round (0 points). At most one per round.
    Win,
    /// Dropped out of the round for a fixed penalty.
    Dropped,
    /// Player was already eliminated when the round opened. Not editable.
    Out,
}

impl RoundResult {
    /// Points this result contributes, or None for unset and out entries.
    pub fn points(self) -> Option<u32> {
        match self {
            RoundResult::Normal(p) => Some(p),
            RoundResult::Win => Some(0),
            RoundResult::Dropped => Some(DROPPED_POINTS),
            RoundResult::Unset | RoundResult::Out => None,
        }
    }

    pub fn is_set(self) -> bool {
        self != RoundResult::Unset
    }

    pub fn is_win(self) -> bool {
        self == RoundResult::Win
    }

    /// Stored status tag (None while unset).
    pub fn status(self) -> Option<EntryStatus> {
        match self {
            RoundResult::Unset => None,
            RoundResult::Normal(_) => Some(EntryStatus::Normal),
            RoundResult::Win => Some(EntryStatus::Win),
            RoundResult::Dropped => Some(EntryStatus::Dropped),
            RoundResult::Out => Some(EntryStatus::Out),
        }
    }

    /// Score-sheet cell text.
    pub fn label(self) -> String {
        match self {
            RoundResult::Unset => String::new(),
            RoundResult::Normal(p) => p.to_string(),
            RoundResult::Win => "Win (0)".to_string(),
            RoundResult::Dropped => format!("Dropped ({})", DROPPED_POINTS),
            RoundResult::Out => "OUT".to_string(),
        }
    }
}

/// Status tag as it appears in a persisted snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Normal,
    Win,
    Dropped,
    Out,
}

/// A player's entry for one round. Serializes as `{roundNum, points, status}`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredEntry", into = "StoredEntry")]
pub struct RoundEntry {
    pub round_num: u32,
    pub result: RoundResult,
}

impl RoundEntry {
    pub fn new(round_num: u32, result: RoundResult) -> Self {
        Self { round_num, result }
    }

    /// Empty entry for an active player.
    pub fn unset(round_num: u32) -> Self {
        Self::new(round_num, RoundResult::Unset)
    }

    /// Placeholder for a player eliminated before the round opened.
    pub fn out(round_num: u32) -> Self {
        Self::new(round_num, RoundResult::Out)
    }

    /// Points counted toward the total (None for unset and out entries).
    pub fn points(&self) -> Option<u32> {
        self.result.points()
    }
}

/// Wire shape of a round entry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    round_num: u32,
    #[serde(default)]
    points: Option<u32>,
    #[serde(default)]
    status: Option<EntryStatus>,
}

impl From<RoundEntry> for StoredEntry {
    fn from(e: RoundEntry) -> Self {
        Self {
            round_num: e.round_num,
            points: e.result.points(),
            status: e.result.status(),
        }
    }
}

impl From<StoredEntry> for RoundEntry {
    fn from(s: StoredEntry) -> Self {
        let result = match (s.status, s.points) {
            (None, _) => RoundResult::Unset,
            (Some(EntryStatus::Normal), Some(p)) => RoundResult::Normal(p),
            // A normal tag without points never left the editor; treat as not entered.
            (Some(EntryStatus::Normal), None) => RoundResult::Unset,
            (Some(EntryStatus::Win), _) => RoundResult::Win,
            (Some(EntryStatus::Dropped), _) => RoundResult::Dropped,
            (Some(EntryStatus::Out), _) => RoundResult::Out,
        };
        Self {
            round_num: s.round_num,
            result,
        }
    }
}
