pub mod error;
pub mod provider;
pub mod types;

use crate::domain::contract::select_recent_games;
use crate::domain::game::{GameRecord, PlayerKey};
use crate::ingest::error::IngestError;
use crate::ingest::provider::StatsProvider;
use crate::ingest::types::ProviderPlayer;
use crate::storage::GameStore;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub player_key: PlayerKey,
    pub player: ProviderPlayer,
    /// Most recent first, at most `MAX_GAMES`.
    pub games: Vec<GameRecord>,
    pub raw_stats: Value,
}

/// Fetches a player's most recent games and replaces whatever is stored for them.
///
/// Nothing is written unless every step before the store succeeds.
pub async fn ingest_last_five_games(
    provider: &dyn StatsProvider,
    store: &dyn GameStore,
    player_name: &str,
) -> Result<IngestOutcome, IngestError> {
    let player_key =
        PlayerKey::parse(player_name).map_err(|e| IngestError::Validation(format!("{e:#}")))?;
    let search_name = player_name.trim();

    let player = provider
        .search_players(search_name)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| IngestError::NotFound(search_name.to_string()))?;

    tracing::debug!(
        %player_key,
        player_id = player.id,
        resolved_name = %player.full_name(),
        provider = provider.provider_name(),
        "resolved player"
    );

    let (rows, raw_stats) = provider.fetch_stat_rows(player.id).await?;
    if rows.is_empty() {
        return Err(IngestError::NoData(format!(
            "no stat rows for {} (id={})",
            player.full_name(),
            player.id
        )));
    }

    let rows_len = rows.len();
    let games = select_recent_games(rows)
        .map_err(|e| IngestError::invalid_response(format!("{e:#}"), Some(raw_stats.clone())))?;
    if games.is_empty() {
        return Err(IngestError::NoData(format!(
            "no recent games for {}",
            player.full_name()
        )));
    }

    store
        .store(&player_key, &games)
        .await
        .map_err(IngestError::Storage)?;

    tracing::info!(
        %player_key,
        player_id = player.id,
        rows_len,
        games_len = games.len(),
        "stored recent games"
    );

    Ok(IngestOutcome {
        player_key,
        player,
        games,
        raw_stats,
    })
}
