use anyhow::{bail, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Most games a single ingestion keeps per player.
pub const MAX_GAMES: usize = 5;

const MIN_PLAYER_NAME_CHARS: usize = 2;

/// Statistic a prop line can be written against.
///
/// Declaration order is the canonical order and is used as the final tie-break when
/// ranking recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Points,
    Rebounds,
    Assists,
    Threes,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::Points,
        StatKind::Rebounds,
        StatKind::Assists,
        StatKind::Threes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Points => "points",
            StatKind::Rebounds => "rebounds",
            StatKind::Assists => "assists",
            StatKind::Threes => "threes",
        }
    }

    /// Capitalized form used in prop labels ("Points 20+").
    pub fn display_name(self) -> &'static str {
        match self {
            StatKind::Points => "Points",
            StatKind::Rebounds => "Rebounds",
            StatKind::Assists => "Assists",
            StatKind::Threes => "Threes",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "points" | "pts" => StatKind::Points,
            "rebounds" | "reb" => StatKind::Rebounds,
            "assists" | "ast" => StatKind::Assists,
            // Box scores call this stat "threes made"; prop lines call it "threes".
            "threes" | "threesmade" | "threes_made" | "3pm" | "fg3m" => StatKind::Threes,
            _ => bail!("unknown prop type: {s:?}"),
        };
        Ok(kind)
    }
}

impl<'de> Deserialize<'de> for StatKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One past game for a player, as stored and as fed to the recommendation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub opponent: String,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub threes_made: u32,
}

impl GameRecord {
    pub fn stat(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Points => self.points,
            StatKind::Rebounds => self.rebounds,
            StatKind::Assists => self.assists,
            StatKind::Threes => self.threes_made,
        }
    }
}

/// Persistence key for a player's stored games.
///
/// Two spellings that differ only in case or spacing map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlayerKey(String);

impl PlayerKey {
    pub fn parse(player_name: &str) -> anyhow::Result<Self> {
        let name = validate_player_name(player_name)?;
        let key = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the trimmed name, or an error describing why it is unusable.
pub fn validate_player_name(player_name: &str) -> anyhow::Result<&str> {
    let name = player_name.trim();
    ensure!(!name.is_empty(), "player name is required");
    ensure!(
        name.chars().count() >= MIN_PLAYER_NAME_CHARS,
        "player name must be at least {MIN_PLAYER_NAME_CHARS} characters"
    );
    Ok(name)
}

/// Checks a caller-supplied game list before it replaces stored games.
pub fn validate_game_records(games: &[GameRecord]) -> anyhow::Result<()> {
    ensure!(
        games.len() <= MAX_GAMES,
        "at most {MAX_GAMES} games can be stored per player (got {})",
        games.len()
    );
    for game in games {
        ensure!(
            !game.opponent.trim().is_empty(),
            "opponent must be non-empty (game on {})",
            game.date
        );
    }
    Ok(())
}

/// Puts games newest first. Stable, so games sharing a date keep their given order.
pub fn order_most_recent_first(games: &mut [GameRecord]) {
    games.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game(points: u32) -> GameRecord {
        GameRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, 27).unwrap(),
            opponent: "BOS".to_string(),
            points,
            rebounds: 7,
            assists: 8,
            threes_made: 2,
        }
    }

    #[test]
    fn stat_kind_parses_aliases_case_insensitively() {
        assert_eq!("Points".parse::<StatKind>().unwrap(), StatKind::Points);
        assert_eq!(" REBOUNDS ".parse::<StatKind>().unwrap(), StatKind::Rebounds);
        assert_eq!("threesMade".parse::<StatKind>().unwrap(), StatKind::Threes);
        assert_eq!("threes".parse::<StatKind>().unwrap(), StatKind::Threes);
        assert!("steals".parse::<StatKind>().is_err());
    }

    #[test]
    fn stat_kind_serializes_as_prop_vocabulary() {
        assert_eq!(serde_json::to_value(StatKind::Threes).unwrap(), json!("threes"));
        let parsed: StatKind = serde_json::from_value(json!("threesMade")).unwrap();
        assert_eq!(parsed, StatKind::Threes);
    }

    #[test]
    fn stat_selects_matching_field() {
        let g = game(31);
        assert_eq!(g.stat(StatKind::Points), 31);
        assert_eq!(g.stat(StatKind::Rebounds), 7);
        assert_eq!(g.stat(StatKind::Assists), 8);
        assert_eq!(g.stat(StatKind::Threes), 2);
    }

    #[test]
    fn player_key_normalizes_case_and_spacing() {
        let a = PlayerKey::parse("  LeBron   James ").unwrap();
        let b = PlayerKey::parse("lebron james").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "lebron james");
    }

    #[test]
    fn rejects_blank_and_single_character_names() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name(" J ").is_err());
        assert_eq!(validate_player_name(" Jo ").unwrap(), "Jo");
    }

    #[test]
    fn game_list_is_capped_at_five() {
        let games: Vec<_> = (0..6).map(|i| game(10 + i)).collect();
        assert!(validate_game_records(&games[..5]).is_ok());
        assert!(validate_game_records(&games).is_err());
        assert!(validate_game_records(&[]).is_ok());
    }

    #[test]
    fn orders_newest_first_keeping_same_day_order() {
        let dated = |day: u32, points: u32| GameRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            ..game(points)
        };
        let mut games = vec![dated(3, 10), dated(9, 20), dated(3, 11), dated(5, 30)];
        order_most_recent_first(&mut games);
        let points: Vec<_> = games.iter().map(|g| g.points).collect();
        assert_eq!(points, vec![20, 30, 10, 11]);
    }
}
