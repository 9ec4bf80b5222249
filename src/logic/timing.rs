//! Elapsed-time readouts for the score sheet. Display only, no effect on play.

use crate::models::Game;
use chrono::{DateTime, TimeDelta, Utc};

/// `HH:MM:SS` for the whole-game clock.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// `MM:SS` between two instants, or `00:00` when either end is unknown.
pub fn format_round_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return "00:00".to_string();
    };
    let total = (end - start).num_seconds().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Duration of each opened round. A round ends when the next one starts; the latest round
/// runs until the game ended, or until `now` while it is still being played.
pub fn round_durations(game: &Game, now: DateTime<Utc>) -> Vec<String> {
    let now = clock_end(game, now);
    (1..=game.current_round as usize)
        .map(|r| {
            let start = game.round_start_times.get(r - 1).copied();
            let end = if r == game.current_round as usize {
                Some(now)
            } else {
                game.round_start_times.get(r).copied()
            };
            format_round_duration(start, end)
        })
        .collect()
}

/// Whole-game clock, or None before the game starts. Stops when the game ends.
pub fn game_elapsed(game: &Game, now: DateTime<Utc>) -> Option<String> {
    let end = clock_end(game, now);
    game.started_at.map(|t| format_elapsed(end - t))
}

fn clock_end(game: &Game, now: DateTime<Utc>) -> DateTime<Utc> {
    game.ended_at.unwrap_or(now)
}
