use serde::{Deserialize, Serialize};

/// `GET /players?search=` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSearchResponse {
    pub data: Vec<ProviderPlayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPlayer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl ProviderPlayer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// `GET /stats?player_ids[]=` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub data: Vec<StatRow>,
}

/// One box-score row. Stat fields may be null for DNPs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatRow {
    #[serde(default)]
    pub pts: Option<i64>,
    #[serde(default)]
    pub reb: Option<i64>,
    #[serde(default)]
    pub ast: Option<i64>,
    #[serde(default)]
    pub fg3m: Option<i64>,
    pub game: StatGame,
    pub team: StatTeam,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatGame {
    pub date: String,
    pub home_team: StatTeam,
    pub visitor_team: StatTeam,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatTeam {
    pub abbreviation: String,
}
