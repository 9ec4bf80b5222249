//! Score engine operations: setup, rounds, point entry, elimination.

mod elimination;
mod rounds;
mod scoring;
mod setup;
mod timing;

pub use elimination::{check_elimination, determine_winner};
pub use rounds::{add_round, add_round_at};
pub use scoring::{parse_points, record_points};
pub use setup::{reset_game, start_game, start_game_in};
pub use timing::{format_elapsed, format_round_duration, game_elapsed, round_durations};
