//! Point entry: interpret raw cell input and record it for a player and round.

use crate::logic::elimination::check_elimination;
use crate::models::{Game, GameError, GameEvent, GamePhase, PlayerId, RoundResult};

/// Interpret raw input (trimmed, case-insensitive).
///
/// - `d` → dropped (fixed penalty)
/// - `w` or `0` → round win (0 points)
/// - a non-negative integer → normal points
pub fn parse_points(raw: &str) -> Result<RoundResult, GameError> {
    let value = raw.trim().to_ascii_lowercase();
    match value.as_str() {
        "d" => Ok(RoundResult::Dropped),
        "w" | "0" => Ok(RoundResult::Win),
        _ => value
            .parse::<u32>()
            .map(RoundResult::Normal)
            .map_err(|_| GameError::InvalidInput(raw.trim().to_string())),
    }
}

/// Record a player's result for a round, then recompute totals and run the elimination check.
///
/// Input for an eliminated player is ignored (no mutation, no events). Any error leaves the game
/// unchanged. Returns the elimination / game-over events produced by this entry.
pub fn record_points(
    game: &mut Game,
    player_id: PlayerId,
    round_num: u32,
    raw: &str,
) -> Result<Vec<GameEvent>, GameError> {
    if game.phase != GamePhase::InProgress {
        return Err(GameError::NotStarted);
    }
    let player = game
        .get_player(player_id)
        .ok_or(GameError::PlayerNotFound(player_id))?;
    if player.is_out {
        log::debug!("Ignoring input for eliminated player {}", player.name);
        return Ok(Vec::new());
    }
    if round_num == 0 || round_num > game.current_round {
        return Err(GameError::RoundOutOfRange {
            round_num,
            current_round: game.current_round,
        });
    }

    let result = parse_points(raw).inspect_err(|e| log::debug!("Rejected input: {}", e))?;

    if result.is_win() {
        let other_winner = game.players.iter().any(|p| {
            p.id != player_id && p.entry(round_num).is_some_and(|e| e.result.is_win())
        });
        if other_winner {
            return Err(GameError::DuplicateWinner { round_num });
        }
    }

    let player = game
        .get_player_mut(player_id)
        .ok_or(GameError::PlayerNotFound(player_id))?;
    if player.total_with(round_num, result).is_none() {
        return Err(GameError::InvalidInput(raw.trim().to_string()));
    }
    player.set_result(round_num, result);
    game.recompute_totals();

    Ok(check_elimination(game))
}
