//! Score sheet export as CSV (rounds × players, plus a totals row).

use crate::models::Game;
use std::io::Write;

/// Write the score table: `Round, <names…>`, one row per round, then `Total`.
pub fn write_score_sheet<W: Write>(game: &Game, out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec!["Round".to_string()];
    header.extend(game.players.iter().map(|p| p.name.clone()));
    wtr.write_record(&header)?;

    for r in 1..=game.current_round {
        let mut row = vec![r.to_string()];
        row.extend(
            game.players
                .iter()
                .map(|p| p.entry(r).map(|e| e.result.label()).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }

    let mut totals = vec!["Total".to_string()];
    totals.extend(game.players.iter().map(|p| p.total_points.to_string()));
    wtr.write_record(&totals)?;

    wtr.flush()?;
    Ok(())
}

/// Score sheet as a CSV string.
pub fn score_sheet_csv(game: &Game) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_score_sheet(game, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
