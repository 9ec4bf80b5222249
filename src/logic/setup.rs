//! Setup phase: start a game from a list of names, and reset back to setup.

use crate::constants::MIN_PLAYERS;
use crate::logic::rounds::add_round;
use crate::models::{Game, GameError, GamePhase, Player, PlayerId};
use chrono::Utc;

/// Start a game: trim and validate names, create players in order, and open round 1.
///
/// Every name must be non-blank and unique (case-insensitive), and at least two are required.
pub fn start_game<S: AsRef<str>>(names: &[S]) -> Result<Game, GameError> {
    let mut game = Game::new();
    start_game_in(&mut game, names)?;
    Ok(game)
}

/// Start a game in an existing (not started) game slot, keeping its id.
pub fn start_game_in<S: AsRef<str>>(game: &mut Game, names: &[S]) -> Result<(), GameError> {
    if game.phase != GamePhase::NotStarted {
        return Err(GameError::AlreadyStarted);
    }
    let players = validate_names(names)?;

    let id = game.id;
    *game = Game::with_id(id);
    game.players = players;
    game.phase = GamePhase::InProgress;
    game.started_at = Some(Utc::now());
    add_round(game)?;

    log::info!(
        "Game {} started with {} players",
        game.id,
        game.players.len()
    );
    Ok(())
}

/// Clear all players and rounds. The game id is kept.
pub fn reset_game(game: &mut Game) {
    let id = game.id;
    *game = Game::with_id(id);
    log::info!("Game {} reset", id);
}

fn validate_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<Player>, GameError> {
    if names.len() < MIN_PLAYERS {
        return Err(GameError::NotEnoughPlayers { given: names.len() });
    }
    let mut players: Vec<Player> = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        if players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(GameError::DuplicatePlayerName(name.to_string()));
        }
        players.push(Player::new(i as PlayerId, name));
    }
    Ok(players)
}
