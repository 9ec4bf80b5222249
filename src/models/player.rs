//! Player and Standing data structures.

use crate::constants::{DANGER_ZONE_POINTS, ELIMINATION_THRESHOLD};
use crate::models::round::{RoundEntry, RoundResult};
use serde::{Deserialize, Serialize};

/// Identifier for a player: position in the start-game name list (0-based).
pub type PlayerId = u32;

/// Display classification of a player (header and total cell styling).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Safe,
    /// Nearing elimination; no effect on play.
    DangerZone,
    Out,
}

/// A player in the game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Sum of points over all entries that count (derived from `rounds`).
    pub total_points: u32,
    /// Set once the total reaches the elimination threshold; never cleared within a game.
    pub is_out: bool,
    /// One entry per round; index i holds round i + 1.
    pub rounds: Vec<RoundEntry>,
}

impl Player {
    /// Create a new player with no rounds and zero points.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            total_points: 0,
            is_out: false,
            rounds: Vec::new(),
        }
    }

    /// Entry for a 1-based round number.
    pub fn entry(&self, round_num: u32) -> Option<&RoundEntry> {
        round_index(round_num).and_then(|i| self.rounds.get(i))
    }

    /// Sum of points over entries that are not out and not unset. Saturates at `u32::MAX`.
    pub fn sum_points(&self) -> u32 {
        self.rounds
            .iter()
            .filter_map(RoundEntry::points)
            .fold(0u32, u32::saturating_add)
    }

    /// Total this player would have with `result` stored for `round_num`, or None on overflow.
    pub fn total_with(&self, round_num: u32, result: RoundResult) -> Option<u32> {
        let others = self
            .rounds
            .iter()
            .filter(|e| e.round_num != round_num)
            .filter_map(RoundEntry::points)
            .try_fold(0u32, u32::checked_add)?;
        others.checked_add(result.points().unwrap_or(0))
    }

    /// Recompute `total_points` from scratch.
    pub fn recompute_total(&mut self) {
        self.total_points = self.sum_points();
    }

    /// Whether the current total is at or over the elimination threshold.
    pub fn over_threshold(&self) -> bool {
        self.total_points >= ELIMINATION_THRESHOLD
    }

    /// Store a result for a round, padding missing slots if the rounds list is short.
    pub fn set_result(&mut self, round_num: u32, result: RoundResult) {
        let Some(idx) = round_index(round_num) else {
            return;
        };
        while self.rounds.len() <= idx {
            let n = self.rounds.len() as u32 + 1;
            self.rounds.push(RoundEntry::unset(n));
        }
        self.rounds[idx] = RoundEntry::new(round_num, result);
    }

    /// Append the entry for a newly opened round.
    pub fn open_round(&mut self, round_num: u32) {
        let entry = if self.is_out {
            RoundEntry::out(round_num)
        } else {
            RoundEntry::unset(round_num)
        };
        self.rounds.push(entry);
    }

    pub fn standing(&self) -> Standing {
        if self.is_out {
            Standing::Out
        } else if self.total_points >= DANGER_ZONE_POINTS {
            Standing::DangerZone
        } else {
            Standing::Safe
        }
    }
}

fn round_index(round_num: u32) -> Option<usize> {
    (round_num as usize).checked_sub(1)
}
