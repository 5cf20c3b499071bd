pub mod domain;
pub mod engine;
pub mod ingest;
pub mod storage;

pub use engine::compute_recommendations;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_STATS_PROVIDER_BASE_URL: &str = "https://api.balldontlie.io/v1";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub sentry_dsn: Option<String>,
        pub stats_provider_base_url: Option<String>,
        pub stats_provider_api_key: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                stats_provider_base_url: std::env::var("STATS_PROVIDER_BASE_URL").ok(),
                stats_provider_api_key: std::env::var("STATS_PROVIDER_API_KEY").ok(),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }

        pub fn require_stats_provider_api_key(&self) -> anyhow::Result<&str> {
            self.stats_provider_api_key
                .as_deref()
                .context("STATS_PROVIDER_API_KEY is required")
        }

        pub fn stats_provider_base_url(&self) -> &str {
            self.stats_provider_base_url
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_STATS_PROVIDER_BASE_URL)
        }
    }

}
