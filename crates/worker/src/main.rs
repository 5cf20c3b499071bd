use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use propcast_core::domain::recommendation::{OfferedProp, OfferedProps};
use propcast_core::domain::session::{SessionEvent, SessionState, Sportsbook};
use propcast_core::ingest::provider::{HttpStatsProvider, StatsProvider};
use propcast_core::storage::memory::MemoryGameStore;
use propcast_core::storage::player_games::PgGameStore;
use propcast_core::storage::GameStore;

#[derive(Debug, Parser)]
#[command(name = "propcast_worker")]
struct Args {
    /// Player to ingest. Repeat for several players.
    #[arg(long = "player", required = true)]
    players: Vec<String>,

    /// Offered prop line such as `points:20` or `threes:3`. Repeatable.
    #[arg(long = "offered")]
    offered: Vec<OfferedProp>,

    /// Only report recommendations that match an offered prop.
    #[arg(long)]
    filter: bool,

    #[arg(long, default_value = "DraftKings")]
    sportsbook: Sportsbook,

    /// Do everything except writing to the database.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn session(&self) -> SessionState {
        let mut session = SessionState::default()
            .apply(SessionEvent::SportsbookChanged(self.sportsbook));
        for prop in &self.offered {
            session = session.apply(SessionEvent::OfferedPropAdded(*prop));
        }
        session.apply(SessionEvent::FilterToggled(self.filter))
    }
}

/// Offered lines as shown to the user, e.g. `Points 20+, Threes 3+`.
fn offered_lines(props: &OfferedProps) -> String {
    props
        .iter()
        .map(|prop| prop.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = propcast_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let mut session = args.session();
    if args.filter && !session.filter_active() {
        tracing::warn!("--filter given without any --offered props; showing all recommendations");
    }
    if session.filter_active() {
        let lines = offered_lines(&session.offered_props);
        tracing::info!(offered = %lines, sportsbook = %session.sportsbook, "filtering to offered lines");
        println!("Offered at {}: {lines}", session.sportsbook);
    }

    let provider = HttpStatsProvider::from_settings(&settings)?;

    let (store, pool): (Arc<dyn GameStore>, Option<sqlx::PgPool>) = if args.dry_run {
        (Arc::new(MemoryGameStore::new()), None)
    } else {
        let db_url = settings.require_database_url()?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await
            .context("connect DATABASE_URL failed")?;
        propcast_core::storage::migrate(&pool).await?;
        (Arc::new(PgGameStore::new(pool.clone())), Some(pool))
    };

    let mut failures: usize = 0;
    for player_name in &args.players {
        let result = propcast_core::ingest::ingest_last_five_games(
            &provider,
            store.as_ref(),
            player_name,
        )
        .await;

        if let Some(pool) = &pool {
            let run_id = propcast_core::storage::ingest_runs::record_ingest_run(
                pool,
                player_name,
                provider.provider_name(),
                &result,
            )
            .await?;
            tracing::debug!(%run_id, %player_name, "recorded ingest run");
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                sentry::capture_error(&err);
                tracing::error!(%player_name, kind = err.kind(), error = %err, "ingestion failed");
                failures += 1;
                continue;
            }
        };

        session = session.apply(SessionEvent::PlayerIngested(player_name.clone()));
        let recommendations = session.recommendations(&outcome.games);

        tracing::info!(
            player_key = %outcome.player_key,
            resolved_name = %outcome.player.full_name(),
            games_len = outcome.games.len(),
            recommendations_len = recommendations.len(),
            filter_active = session.filter_active(),
            sportsbook = %session.sportsbook,
            dry_run = args.dry_run,
            "recommendations ready"
        );

        println!(
            "{} (last {} games, {}):",
            outcome.player.full_name(),
            outcome.games.len(),
            session.sportsbook
        );
        if recommendations.is_empty() {
            println!("  no line hit in at least 60% of games");
        }
        for rec in &recommendations {
            println!("  {rec}");
        }
    }

    anyhow::ensure!(
        failures < args.players.len(),
        "ingestion failed for every requested player ({failures})"
    );
    Ok(())
}

fn init_sentry(settings: &propcast_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
