use crate::domain::game::{GameRecord, PlayerKey};
use crate::storage::GameStore;
use anyhow::Context;
use chrono::Utc;
use sqlx::types::Json;

#[derive(Debug, Clone)]
pub struct PgGameStore {
    pool: sqlx::PgPool,
}

impl PgGameStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GameStore for PgGameStore {
    async fn store(&self, key: &PlayerKey, games: &[GameRecord]) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO player_games (player_key, games, stored_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (player_key) DO UPDATE \
               SET games = EXCLUDED.games, stored_at = EXCLUDED.stored_at",
        )
        .persistent(false)
        .bind(key.as_str())
        .bind(Json(games))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .with_context(|| format!("upsert player_games failed (player_key={key})"))?;

        tracing::debug!(%key, games_len = games.len(), "player_games upsert");
        Ok(())
    }

    async fn fetch(&self, key: &PlayerKey) -> anyhow::Result<Option<Vec<GameRecord>>> {
        let row: Option<(Json<Vec<GameRecord>>,)> =
            sqlx::query_as("SELECT games FROM player_games WHERE player_key = $1")
                .persistent(false)
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("select player_games failed (player_key={key})"))?;

        Ok(row.map(|(Json(games),)| games))
    }
}
