//! Opening rounds.

use crate::models::{Game, GameError, GamePhase};
use chrono::{DateTime, Utc};

/// Open the next round, stamped with the current time. Returns the new round number.
pub fn add_round(game: &mut Game) -> Result<u32, GameError> {
    add_round_at(game, Utc::now())
}

/// Open the next round with an explicit start time.
///
/// 1. Game must be in progress.
/// 2. Unless this is the first round, every active player needs an entry for the current round.
///    A winner is not required.
/// 3. Every player gets an entry for the new round: unset if active, out if eliminated.
pub fn add_round_at(game: &mut Game, started_at: DateTime<Utc>) -> Result<u32, GameError> {
    if game.phase != GamePhase::InProgress {
        return Err(GameError::NotStarted);
    }

    if game.current_round > 0 {
        let current = game.current_round;
        let missing: Vec<String> = game
            .active_players()
            .filter(|p| !p.entry(current).is_some_and(|e| e.result.is_set()))
            .map(|p| p.name.clone())
            .collect();
        if !missing.is_empty() {
            log::debug!("Round {} incomplete, missing {:?}", current, missing);
            return Err(GameError::IncompleteRound { missing });
        }
    }

    game.current_round += 1;
    let round_num = game.current_round;
    game.round_start_times.push(started_at);
    for p in &mut game.players {
        p.open_round(round_num);
    }

    log::debug!("Game {} opened round {}", game.id, round_num);
    Ok(round_num)
}
