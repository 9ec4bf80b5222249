//! Integration tests for round timing readouts and the CSV score sheet.

use chrono::{TimeDelta, TimeZone, Utc};
use rummy_record::export::score_sheet_csv;
use rummy_record::{
    add_round, add_round_at, format_elapsed, format_round_duration, game_elapsed, record_points,
    round_durations, start_game, GamePhase, Standing,
};

#[test]
fn elapsed_is_hours_minutes_seconds() {
    assert_eq!(format_elapsed(TimeDelta::seconds(0)), "00:00:00");
    assert_eq!(format_elapsed(TimeDelta::seconds(3725)), "01:02:05");
    assert_eq!(format_elapsed(TimeDelta::seconds(-5)), "00:00:00");
}

#[test]
fn round_duration_is_minutes_seconds() {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
    assert_eq!(
        format_round_duration(Some(t0), Some(t0 + TimeDelta::seconds(95))),
        "01:35"
    );
    assert_eq!(format_round_duration(None, Some(t0)), "00:00");
    assert_eq!(format_round_duration(Some(t0), None), "00:00");
}

#[test]
fn each_round_runs_until_the_next_one_starts() {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
    let mut game = start_game(&["A", "B"]).unwrap();
    game.started_at = Some(t0);
    game.round_start_times = vec![t0];

    record_points(&mut game, 0, 1, "w").unwrap();
    record_points(&mut game, 1, 1, "20").unwrap();
    add_round_at(&mut game, t0 + TimeDelta::seconds(60)).unwrap();

    let now = t0 + TimeDelta::seconds(90);
    assert_eq!(round_durations(&game, now), ["01:00", "00:30"]);
    assert_eq!(game_elapsed(&game, now).as_deref(), Some("00:01:30"));
}

#[test]
fn standing_flags_danger_zone_and_out() {
    let mut game = start_game(&["A", "B", "C"]).unwrap();
    record_points(&mut game, 0, 1, "199").unwrap();
    record_points(&mut game, 1, 1, "200").unwrap();
    record_points(&mut game, 2, 1, "250").unwrap();

    let standings: Vec<_> = game.players.iter().map(|p| p.standing()).collect();
    assert_eq!(
        standings,
        [Standing::Safe, Standing::DangerZone, Standing::Out]
    );
}

#[test]
fn score_sheet_lists_rounds_and_totals() {
    let mut game = start_game(&["A", "B"]).unwrap();
    record_points(&mut game, 0, 1, "w").unwrap();
    record_points(&mut game, 1, 1, "d").unwrap();
    add_round(&mut game).unwrap();
    record_points(&mut game, 0, 2, "12").unwrap();

    let csv = score_sheet_csv(&game).unwrap();
    assert_eq!(
        csv,
        "Round,A,B\n1,Win (0),Dropped (25)\n2,12,\nTotal,12,25\n"
    );
}

#[test]
fn score_sheet_marks_eliminated_players() {
    let mut game = start_game(&["A", "B", "C"]).unwrap();
    record_points(&mut game, 0, 1, "w").unwrap();
    record_points(&mut game, 1, 1, "260").unwrap();
    record_points(&mut game, 2, 1, "5").unwrap();
    add_round(&mut game).unwrap();

    let csv = score_sheet_csv(&game).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[2], "2,,OUT,");
    assert_eq!(lines[3], "Total,0,260,5");
}

#[test]
fn clocks_stop_when_the_game_ends() {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
    let mut game = start_game(&["A", "B"]).unwrap();
    record_points(&mut game, 0, 1, "w").unwrap();
    record_points(&mut game, 1, 1, "20").unwrap();
    add_round(&mut game).unwrap();
    record_points(&mut game, 0, 2, "w").unwrap();
    record_points(&mut game, 1, 2, "240").unwrap();
    assert_eq!(game.phase, GamePhase::Ended);
    assert!(game.ended_at.is_some());

    game.started_at = Some(t0);
    game.round_start_times = vec![t0, t0 + TimeDelta::seconds(300)];
    game.ended_at = Some(t0 + TimeDelta::seconds(420));

    let days_later = t0 + TimeDelta::days(3);
    assert_eq!(game_elapsed(&game, days_later).as_deref(), Some("00:07:00"));
    assert_eq!(round_durations(&game, days_later), ["05:00", "02:00"]);
}
