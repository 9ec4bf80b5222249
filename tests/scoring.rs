//! Integration tests for point entry, rounds, elimination and the winner.

use rummy_record::{
    add_round, check_elimination, determine_winner, parse_points, record_points, start_game,
    Game, GameError, GameErrorKind, GameEvent, GamePhase, RoundResult, Winner,
};

fn game_with(names: &[&str]) -> Game {
    start_game(names).unwrap()
}

fn totals(game: &Game) -> Vec<u32> {
    game.players.iter().map(|p| p.total_points).collect()
}

fn assert_totals_match_rounds(game: &Game) {
    for p in &game.players {
        let sum: u32 = p
            .rounds
            .iter()
            .filter(|e| e.result != RoundResult::Out)
            .filter_map(|e| e.points())
            .sum();
        assert_eq!(p.total_points, sum, "total for {}", p.name);
    }
}

#[test]
fn parse_points_interprets_markers_and_numbers() {
    assert_eq!(parse_points("d"), Ok(RoundResult::Dropped));
    assert_eq!(parse_points(" D "), Ok(RoundResult::Dropped));
    assert_eq!(parse_points("W"), Ok(RoundResult::Win));
    assert_eq!(parse_points("0"), Ok(RoundResult::Win));
    assert_eq!(parse_points("42"), Ok(RoundResult::Normal(42)));
    assert_eq!(parse_points("00"), Ok(RoundResult::Normal(0)));
}

#[test]
fn parse_points_rejects_garbage() {
    for raw in ["", "  ", "-5", "abc", "1.5", "12x"] {
        assert!(
            matches!(parse_points(raw), Err(GameError::InvalidInput(_))),
            "{raw:?} should be rejected"
        );
    }
}

#[test]
fn two_player_round_then_next_round_opens() {
    let mut game = game_with(&["A", "B"]);

    assert_eq!(record_points(&mut game, 0, 1, "w"), Ok(vec![]));
    assert_eq!(record_points(&mut game, 1, 1, "30"), Ok(vec![]));
    assert_eq!(totals(&game), [0, 30]);
    assert_eq!(game.players[0].rounds[0].result, RoundResult::Win);
    assert_eq!(game.players[1].rounds[0].result, RoundResult::Normal(30));

    assert_eq!(add_round(&mut game), Ok(2));
    assert_eq!(game.current_round, 2);
    assert_eq!(game.round_start_times.len(), 2);
    for p in &game.players {
        assert_eq!(p.rounds.len(), 2);
        assert_eq!(p.rounds[1].round_num, 2);
        assert_eq!(p.rounds[1].result, RoundResult::Unset);
    }
}

#[test]
fn dropped_is_always_twenty_five() {
    let mut game = game_with(&["A", "B"]);
    record_points(&mut game, 1, 1, "80").unwrap();
    record_points(&mut game, 1, 1, "d").unwrap();

    let entry = game.players[1].entry(1).unwrap();
    assert_eq!(entry.result, RoundResult::Dropped);
    assert_eq!(entry.points(), Some(25));
    assert_eq!(game.players[1].total_points, 25);
}

#[test]
fn second_winner_in_a_round_is_rejected() {
    let mut game = game_with(&["A", "B", "C"]);
    record_points(&mut game, 0, 1, "w").unwrap();
    let before = game.clone();

    assert_eq!(
        record_points(&mut game, 1, 1, "0"),
        Err(GameError::DuplicateWinner { round_num: 1 })
    );
    assert_eq!(game, before);

    // The same player may re-enter their own win.
    assert_eq!(record_points(&mut game, 0, 1, "W"), Ok(vec![]));
    assert_eq!(game.round_winner(1).map(|p| p.id), Some(0));
}

#[test]
fn winner_can_move_after_first_winner_is_corrected() {
    let mut game = game_with(&["A", "B"]);
    record_points(&mut game, 0, 1, "w").unwrap();
    record_points(&mut game, 0, 1, "15").unwrap();
    assert_eq!(record_points(&mut game, 1, 1, "w"), Ok(vec![]));
    assert_eq!(game.round_winner(1).map(|p| p.id), Some(1));
}

#[test]
fn invalid_input_leaves_game_unchanged() {
    let mut game = game_with(&["A", "B"]);
    record_points(&mut game, 0, 1, "12").unwrap();
    let before = game.clone();

    assert!(matches!(
        record_points(&mut game, 0, 1, "twelve"),
        Err(GameError::InvalidInput(_))
    ));
    assert_eq!(game, before);
}

#[test]
fn unknown_player_and_round_are_rejected() {
    let mut game = game_with(&["A", "B"]);
    assert_eq!(
        record_points(&mut game, 7, 1, "5"),
        Err(GameError::PlayerNotFound(7))
    );
    assert_eq!(
        record_points(&mut game, 0, 2, "5"),
        Err(GameError::RoundOutOfRange {
            round_num: 2,
            current_round: 1
        })
    );
    assert_eq!(
        record_points(&mut game, 0, 0, "5"),
        Err(GameError::RoundOutOfRange {
            round_num: 0,
            current_round: 1
        })
    );
}

#[test]
fn add_round_requires_every_active_player() {
    let mut game = game_with(&["A", "B", "C"]);
    record_points(&mut game, 0, 1, "10").unwrap();
    let before = game.clone();

    assert_eq!(
        add_round(&mut game),
        Err(GameError::IncompleteRound {
            missing: vec!["B".to_string(), "C".to_string()]
        })
    );
    assert_eq!(game, before);
}

#[test]
fn add_round_does_not_require_a_winner() {
    let mut game = game_with(&["A", "B"]);
    record_points(&mut game, 0, 1, "10").unwrap();
    record_points(&mut game, 1, 1, "d").unwrap();
    assert_eq!(add_round(&mut game), Ok(2));
}

#[test]
fn earlier_rounds_stay_editable() {
    let mut game = game_with(&["A", "B"]);
    record_points(&mut game, 0, 1, "10").unwrap();
    record_points(&mut game, 1, 1, "w").unwrap();
    add_round(&mut game).unwrap();
    record_points(&mut game, 0, 2, "5").unwrap();

    record_points(&mut game, 0, 1, "40").unwrap();
    assert_eq!(totals(&game), [45, 0]);
    assert_totals_match_rounds(&game);
}

#[test]
fn reaching_threshold_exactly_eliminates() {
    let mut game = game_with(&["A", "B", "C"]);
    let events = record_points(&mut game, 0, 1, "250").unwrap();

    assert_eq!(
        events,
        vec![GameEvent::PlayerEliminated {
            player_id: 0,
            name: "A".to_string(),
            total: 250
        }]
    );
    assert!(game.players[0].is_out);
    assert_eq!(game.phase, GamePhase::InProgress);

    // Already out: a second check changes nothing.
    assert!(check_elimination(&mut game).is_empty());
}

#[test]
fn eliminated_player_gets_out_entries_and_ignores_input() {
    let mut game = game_with(&["A", "B", "C"]);
    record_points(&mut game, 0, 1, "260").unwrap();

    // Eliminated players are not needed to close the round.
    record_points(&mut game, 1, 1, "w").unwrap();
    record_points(&mut game, 2, 1, "35").unwrap();
    assert_eq!(add_round(&mut game), Ok(2));

    let a = &game.players[0];
    assert_eq!(a.rounds[1].result, RoundResult::Out);
    assert_eq!(a.rounds[1].points(), None);

    let before = game.clone();
    assert_eq!(record_points(&mut game, 0, 2, "5"), Ok(vec![]));
    assert_eq!(record_points(&mut game, 0, 1, "5"), Ok(vec![]));
    assert_eq!(game, before);
    assert!(game.players[0].is_out);
    assert_eq!(game.players[0].total_points, 260);
}

#[test]
fn last_survivor_wins_and_game_ends() {
    let mut game = game_with(&["A", "B"]);
    record_points(&mut game, 0, 1, "w").unwrap();
    let events = record_points(&mut game, 1, 1, "260").unwrap();

    let winner = Winner {
        player_id: 0,
        name: "A".to_string(),
        total: 0,
    };
    assert_eq!(
        events,
        vec![
            GameEvent::PlayerEliminated {
                player_id: 1,
                name: "B".to_string(),
                total: 260
            },
            GameEvent::GameEnded {
                winner: winner.clone()
            },
        ]
    );
    assert_eq!(game.phase, GamePhase::Ended);
    assert!(!game.is_started());
    assert_eq!(game.winner, Some(winner));

    assert_eq!(add_round(&mut game), Err(GameError::NotStarted));
    assert_eq!(record_points(&mut game, 0, 1, "5"), Err(GameError::NotStarted));
    assert!(check_elimination(&mut game).is_empty());
}

#[test]
fn survivor_wins_over_several_rounds() {
    let mut game = game_with(&["A", "B", "C"]);
    let rounds = [["120", "w", "60"], ["w", "130", "200"]];
    for (r, scores) in rounds.iter().enumerate() {
        for (pid, raw) in scores.iter().enumerate() {
            record_points(&mut game, pid as u32, r as u32 + 1, raw).unwrap();
        }
        if r == 0 {
            add_round(&mut game).unwrap();
        }
    }
    // C reached 260 in round 2; A (120) and B (130) are still in.
    assert!(game.players[2].is_out);
    assert_eq!(game.phase, GamePhase::InProgress);

    add_round(&mut game).unwrap();
    record_points(&mut game, 0, 3, "w").unwrap();
    let events = record_points(&mut game, 1, 3, "125").unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(game.phase, GamePhase::Ended);
    assert_eq!(
        game.winner,
        Some(Winner {
            player_id: 0,
            name: "A".to_string(),
            total: 120
        })
    );
    assert_totals_match_rounds(&game);
}

#[test]
fn winner_among_several_active_is_lowest_then_earliest() {
    let mut game = game_with(&["A", "B", "C"]);
    for (p, total) in game.players.iter_mut().zip([40, 10, 10]) {
        p.total_points = total;
    }
    assert_eq!(determine_winner(&game).map(|w| w.player_id), Some(1));
}

#[test]
fn winner_when_everyone_is_out_is_lowest_overall() {
    let mut game = game_with(&["A", "B", "C"]);
    for (p, total) in game.players.iter_mut().zip([300, 255, 255]) {
        p.total_points = total;
        p.is_out = true;
    }
    assert_eq!(
        determine_winner(&game),
        Some(Winner {
            player_id: 1,
            name: "B".to_string(),
            total: 255
        })
    );
}

#[test]
fn no_winner_without_players() {
    assert_eq!(determine_winner(&Game::new()), None);
}

#[test]
fn entry_that_would_overflow_the_total_is_rejected() {
    let mut game = game_with(&["A", "B", "C"]);
    record_points(&mut game, 0, 1, "10").unwrap();
    record_points(&mut game, 1, 1, "w").unwrap();
    record_points(&mut game, 2, 1, "5").unwrap();
    add_round(&mut game).unwrap();
    let before = game.clone();

    assert_eq!(
        record_points(&mut game, 0, 2, "4294967295"),
        Err(GameError::InvalidInput("4294967295".to_string()))
    );
    assert_eq!(game, before);
}

#[test]
fn largest_total_that_fits_still_eliminates() {
    let mut game = game_with(&["A", "B", "C"]);
    record_points(&mut game, 0, 1, "10").unwrap();
    record_points(&mut game, 1, 1, "w").unwrap();
    record_points(&mut game, 2, 1, "5").unwrap();
    add_round(&mut game).unwrap();

    let events = record_points(&mut game, 0, 2, "4294967285").unwrap();
    assert_eq!(game.players[0].total_points, u32::MAX);
    assert!(game.players[0].is_out);
    assert_eq!(events.len(), 1);
    assert_totals_match_rounds(&game);
}

#[test]
fn errors_fall_into_broad_kinds() {
    assert_eq!(
        start_game(&["A"]).unwrap_err().kind(),
        GameErrorKind::Validation
    );
    assert_eq!(
        start_game(&["A", ""]).unwrap_err().kind(),
        GameErrorKind::Validation
    );
    assert_eq!(
        start_game(&["A", "a"]).unwrap_err().kind(),
        GameErrorKind::Validation
    );

    let mut game = game_with(&["A", "B"]);
    record_points(&mut game, 0, 1, "w").unwrap();
    assert_eq!(
        record_points(&mut game, 1, 1, "w").unwrap_err().kind(),
        GameErrorKind::DuplicateWinner
    );
    assert_eq!(
        record_points(&mut game, 1, 1, "x").unwrap_err().kind(),
        GameErrorKind::InvalidInput
    );
    assert_eq!(
        add_round(&mut game).unwrap_err().kind(),
        GameErrorKind::IncompleteRound
    );
    assert_eq!(
        add_round(&mut Game::new()).unwrap_err().kind(),
        GameErrorKind::State
    );
}
