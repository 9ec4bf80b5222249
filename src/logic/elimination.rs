//! Elimination and game-over: mark players out at the threshold, end the game, pick the winner.

use crate::models::{Game, GameEvent, GamePhase, Player, Winner};
use chrono::Utc;

/// Mark every active player at or over the threshold as out, and end the game when at most one
/// active player is left after at least one round.
///
/// Idempotent: players already out and an already ended game produce no further events.
pub fn check_elimination(game: &mut Game) -> Vec<GameEvent> {
    let mut events = Vec::new();

    for p in game.players.iter_mut().filter(|p| !p.is_out) {
        if p.over_threshold() {
            p.is_out = true;
            log::info!(
                "{} has reached {} points and is now out of the game",
                p.name,
                p.total_points
            );
            events.push(GameEvent::PlayerEliminated {
                player_id: p.id,
                name: p.name.clone(),
                total: p.total_points,
            });
        }
    }

    let active = game.active_players().count();
    if game.phase == GamePhase::InProgress && active <= 1 && game.current_round > 0 {
        game.phase = GamePhase::Ended;
        game.ended_at = Some(Utc::now());
        game.winner = determine_winner(game);
        if let Some(w) = &game.winner {
            log::info!("Game {} over: {} wins with {} points", game.id, w.name, w.total);
            events.push(GameEvent::GameEnded { winner: w.clone() });
        }
    }

    events
}

/// Winner of a finished game.
///
/// The lowest total among active players (normally the single survivor); if everyone is out,
/// the lowest total among all players. Ties go to the earlier player.
pub fn determine_winner(game: &Game) -> Option<Winner> {
    let best = game
        .active_players()
        .min_by_key(|p| p.total_points)
        .or_else(|| game.players.iter().min_by_key(|p| p.total_points))?;
    Some(winner_of(best))
}

fn winner_of(p: &Player) -> Winner {
    Winner {
        player_id: p.id,
        name: p.name.clone(),
        total: p.total_points,
    }
}
