pub mod ingest_runs;
pub mod memory;
pub mod player_games;

use crate::domain::game::{GameRecord, PlayerKey};
use anyhow::Context;

/// Keyed store of each player's most recent games. Writes replace the whole list.
#[async_trait::async_trait]
pub trait GameStore: Send + Sync {
    async fn store(&self, key: &PlayerKey, games: &[GameRecord]) -> anyhow::Result<()>;

    async fn fetch(&self, key: &PlayerKey) -> anyhow::Result<Option<Vec<GameRecord>>>;
}

pub async fn migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("sqlx migrations failed")?;
    Ok(())
}
