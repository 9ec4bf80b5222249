//! Data structures for the score sheet: players, round entries, game state.

mod game;
mod player;
mod round;

pub use game::{Game, GameError, GameErrorKind, GameEvent, GameId, GamePhase, Winner};
pub use player::{Player, PlayerId, Standing};
pub use round::{EntryStatus, RoundEntry, RoundResult};
