use crate::domain::game::{GameRecord, MAX_GAMES};
use crate::ingest::types::StatRow;
use anyhow::{ensure, Context};
use chrono::{DateTime, NaiveDate};

impl StatRow {
    pub fn game_date(&self) -> anyhow::Result<NaiveDate> {
        let raw = self.game.date.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        // Older API versions return midnight timestamps ("2024-01-15T00:00:00.000Z").
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .with_context(|| format!("game date is not a calendar date: {raw:?}"))
    }

    /// Abbreviation of whichever side is not the player's own team.
    pub fn opponent(&self) -> &str {
        let own = self.team.abbreviation.trim();
        if own == self.game.home_team.abbreviation.trim() {
            self.game.visitor_team.abbreviation.trim()
        } else {
            self.game.home_team.abbreviation.trim()
        }
    }

    fn validate_and_into_game(self, date: NaiveDate) -> anyhow::Result<GameRecord> {
        let opponent = self.opponent().to_string();
        ensure!(!opponent.is_empty(), "opponent abbreviation must be non-empty ({date})");

        Ok(GameRecord {
            date,
            opponent,
            points: non_negative("pts", self.pts, date)?,
            rebounds: non_negative("reb", self.reb, date)?,
            assists: non_negative("ast", self.ast, date)?,
            threes_made: non_negative("fg3m", self.fg3m, date)?,
        })
    }
}

fn non_negative(field: &str, value: Option<i64>, date: NaiveDate) -> anyhow::Result<u32> {
    let v = value.unwrap_or(0);
    ensure!(v >= 0, "{field} must be non-negative (got {v} on {date})");
    u32::try_from(v).with_context(|| format!("{field} out of range (got {v} on {date})"))
}

/// Orders rows newest first, keeps the `MAX_GAMES` most recent and maps them to games.
///
/// Rows sharing a date keep the provider's relative order.
pub fn select_recent_games(rows: Vec<StatRow>) -> anyhow::Result<Vec<GameRecord>> {
    let mut dated = Vec::with_capacity(rows.len());
    for row in rows {
        let date = row.game_date()?;
        dated.push((date, row));
    }

    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.truncate(MAX_GAMES);

    dated
        .into_iter()
        .map(|(date, row)| row.validate_and_into_game(date))
        .collect()
}
