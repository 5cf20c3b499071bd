use crate::domain::game::{GameRecord, PlayerKey};
use crate::storage::GameStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store for tests, dry runs and running without a database.
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    games: RwLock<HashMap<PlayerKey, Vec<GameRecord>>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl GameStore for MemoryGameStore {
    async fn store(&self, key: &PlayerKey, games: &[GameRecord]) -> anyhow::Result<()> {
        self.games.write().await.insert(key.clone(), games.to_vec());
        Ok(())
    }

    async fn fetch(&self, key: &PlayerKey) -> anyhow::Result<Option<Vec<GameRecord>>> {
        Ok(self.games.read().await.get(key).cloned())
    }
}
