use crate::config::Settings;
use crate::ingest::error::IngestError;
use crate::ingest::types::{PlayerSearchResponse, ProviderPlayer, StatRow, StatsResponse};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PER_PAGE: u32 = 25;
const MAX_PER_PAGE: u32 = 100;
const PLAYERS_PATH: &str = "/players";
const STATS_PATH: &str = "/stats";

// Error bodies can be whole HTML pages; keep log lines readable.
const MAX_ERROR_BODY_CHARS: usize = 300;

#[async_trait::async_trait]
pub trait StatsProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Players matching `name`, in provider relevance order.
    async fn search_players(&self, name: &str) -> Result<Vec<ProviderPlayer>, IngestError>;

    /// Box-score rows for one player, unordered, plus the raw payload for auditing.
    async fn fetch_stat_rows(&self, player_id: i64)
        -> Result<(Vec<StatRow>, Value), IngestError>;
}

#[derive(Debug, Clone)]
pub struct HttpStatsProvider {
    http: reqwest::Client,
    base_url: String,
    per_page: u32,
}

impl HttpStatsProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.stats_provider_base_url().to_string();

        let timeout_secs = std::env::var("STATS_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let per_page = std::env::var("STATS_PROVIDER_PER_PAGE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);

        let mut headers = HeaderMap::new();
        if let Some(api_key) = settings.stats_provider_api_key.as_deref() {
            let mut value =
                HeaderValue::from_str(api_key.trim()).context("STATS_PROVIDER_API_KEY is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .context("failed to build stats provider http client")?;

        Ok(Self {
            http,
            base_url,
            per_page,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, IngestError> {
        let res = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| IngestError::Transport(format!("GET {path}: {e}")))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| IngestError::Transport(format!("GET {path}: failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(IngestError::Transport(format!(
                "GET {path} returned HTTP {status}: {}",
                truncate(&text)
            )));
        }

        serde_json::from_str::<Value>(&text).map_err(|e| {
            IngestError::invalid_response(
                format!("GET {path} body is not valid JSON ({e}): {}", truncate(&text)),
                Some(serde_json::json!({ "raw_text": text })),
            )
        })
    }
}

fn parse_envelope<T: DeserializeOwned>(path: &str, raw: Value) -> Result<T, IngestError> {
    serde_json::from_value::<T>(raw.clone()).map_err(|e| {
        IngestError::invalid_response(format!("unexpected GET {path} payload shape: {e}"), Some(raw))
    })
}

fn truncate(text: &str) -> String {
    let mut out: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if text.chars().count() > MAX_ERROR_BODY_CHARS {
        out.push_str("...");
    }
    out
}

#[async_trait::async_trait]
impl StatsProvider for HttpStatsProvider {
    fn provider_name(&self) -> &'static str {
        "balldontlie"
    }

    async fn search_players(&self, name: &str) -> Result<Vec<ProviderPlayer>, IngestError> {
        let raw = self
            .get_json(PLAYERS_PATH, &[("search", name.to_string())])
            .await?;
        let parsed: PlayerSearchResponse = parse_envelope(PLAYERS_PATH, raw)?;
        Ok(parsed.data)
    }

    async fn fetch_stat_rows(
        &self,
        player_id: i64,
    ) -> Result<(Vec<StatRow>, Value), IngestError> {
        let raw = self
            .get_json(
                STATS_PATH,
                &[
                    ("player_ids[]", player_id.to_string()),
                    ("per_page", self.per_page.to_string()),
                ],
            )
            .await?;
        let parsed: StatsResponse = parse_envelope(STATS_PATH, raw.clone())?;
        Ok((parsed.data, raw))
    }
}
