//! Game rule constants.

/// Total at or above which a player is out of the game.
pub const ELIMINATION_THRESHOLD: u32 = 250;

/// Total at or above which a player is flagged as close to elimination (display only).
pub const DANGER_ZONE_POINTS: u32 = 200;

/// Fixed penalty for dropping out of a round.
pub const DROPPED_POINTS: u32 = 25;

/// Minimum number of players to start a game.
pub const MIN_PLAYERS: usize = 2;
