use crate::domain::game::GameRecord;
use crate::domain::recommendation::{OfferedProp, OfferedProps, PropRecommendation};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sportsbook {
    #[default]
    DraftKings,
    FanDuel,
    Bet365,
    Other,
}

impl fmt::Display for Sportsbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sportsbook::DraftKings => "DraftKings",
            Sportsbook::FanDuel => "FanDuel",
            Sportsbook::Bet365 => "Bet365",
            Sportsbook::Other => "Other",
        };
        f.write_str(s)
    }
}

impl FromStr for Sportsbook {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let book = match s.trim().to_ascii_lowercase().as_str() {
            "draftkings" => Sportsbook::DraftKings,
            "fanduel" => Sportsbook::FanDuel,
            "bet365" => Sportsbook::Bet365,
            "other" => Sportsbook::Other,
            _ => bail!("unknown sportsbook: {s:?}"),
        };
        Ok(book)
    }
}

/// Caller-side selections for one browsing session. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub selected_player: Option<String>,
    pub ingestion_complete: bool,
    pub offered_props: OfferedProps,
    pub filter_enabled: bool,
    pub sportsbook: Sportsbook,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The name field changed; previously fetched games no longer apply.
    PlayerNameEdited,
    PlayerIngested(String),
    OfferedPropAdded(OfferedProp),
    OfferedPropRemoved(usize),
    FilterToggled(bool),
    SportsbookChanged(Sportsbook),
    Reset,
}

impl SessionState {
    pub fn apply(self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::PlayerNameEdited => Self {
                ingestion_complete: false,
                ..self
            },
            SessionEvent::PlayerIngested(name) => Self {
                selected_player: Some(name),
                ingestion_complete: true,
                ..self
            },
            SessionEvent::OfferedPropAdded(prop) => {
                let mut offered_props = self.offered_props;
                offered_props.add(prop);
                Self {
                    offered_props,
                    ..self
                }
            }
            SessionEvent::OfferedPropRemoved(index) => {
                let mut offered_props = self.offered_props;
                offered_props.remove(index);
                // Filtering on an empty list would be a silent no-op; switch it off.
                let filter_enabled = self.filter_enabled && !offered_props.is_empty();
                Self {
                    offered_props,
                    filter_enabled,
                    ..self
                }
            }
            SessionEvent::FilterToggled(enabled) => Self {
                filter_enabled: enabled && !self.offered_props.is_empty(),
                ..self
            },
            SessionEvent::SportsbookChanged(sportsbook) => Self { sportsbook, ..self },
            SessionEvent::Reset => Self::default(),
        }
    }

    pub fn filter_active(&self) -> bool {
        self.filter_enabled && !self.offered_props.is_empty()
    }

    pub fn recommendations(&self, games: &[GameRecord]) -> Vec<PropRecommendation> {
        crate::engine::compute_recommendations(games, &self.offered_props, self.filter_enabled)
    }
}
