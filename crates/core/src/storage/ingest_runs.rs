use crate::ingest::error::IngestError;
use crate::ingest::IngestOutcome;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Column values of one `player_ingest_runs` row.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRunRow {
    pub status: &'static str,
    pub error_kind: Option<&'static str>,
    pub error: Option<String>,
    pub games_len: Option<i32>,
    /// Provider payload; kept on failures too when the provider answered.
    pub raw_response: Option<Value>,
}

impl IngestRunRow {
    pub fn from_result(result: &Result<IngestOutcome, IngestError>) -> Self {
        match result {
            Ok(outcome) => Self {
                status: "success",
                error_kind: None,
                error: None,
                games_len: Some(outcome.games.len() as i32),
                raw_response: Some(outcome.raw_stats.clone()),
            },
            Err(err) => Self {
                status: "error",
                error_kind: Some(err.kind()),
                error: Some(err.to_string()),
                games_len: None,
                raw_response: err.raw_response().cloned(),
            },
        }
    }
}

/// Appends one audit row per ingestion attempt, successful or not.
pub async fn record_ingest_run(
    pool: &sqlx::PgPool,
    player_name: &str,
    provider: &str,
    result: &Result<IngestOutcome, IngestError>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let generated_at: DateTime<Utc> = Utc::now();
    let row = IngestRunRow::from_result(result);

    sqlx::query(
        "INSERT INTO player_ingest_runs \
           (id, player_name, generated_at, provider, status, error_kind, error, games_len, raw_response) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .persistent(false)
    .bind(id)
    .bind(player_name.trim())
    .bind(generated_at)
    .bind(provider)
    .bind(row.status)
    .bind(row.error_kind)
    .bind(row.error)
    .bind(row.games_len)
    .bind(row.raw_response)
    .execute(pool)
    .await
    .context("insert player_ingest_runs failed")?;

    Ok(id)
}
