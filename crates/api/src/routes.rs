use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;

use propcast_core::domain::game::{
    order_most_recent_first, validate_game_records, GameRecord, PlayerKey,
};
use propcast_core::domain::recommendation::{Confidence, OfferedProps, PropRecommendation};
use propcast_core::ingest::error::IngestError;
use propcast_core::ingest::provider::StatsProvider;
use propcast_core::ingest::types::ProviderPlayer;
use propcast_core::storage::GameStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub provider: Arc<dyn StatsProvider>,
    /// Present only when running against Postgres; used for the ingest audit trail.
    pub pool: Option<PgPool>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/recommendations", post(compute_recommendations))
        .route("/players/:player_name/ingest", post(ingest_player))
        .route(
            "/players/:player_name/games",
            get(get_player_games).put(put_player_games),
        )
        .route(
            "/players/:player_name/recommendations",
            post(get_player_recommendations),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    fn bad_request(err: anyhow::Error) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation", format!("{err:#}"))
    }

    fn internal(err: anyhow::Error) -> Self {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %format!("{err:#}"), "request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage",
            "failed to access stored games",
        )
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        let status = match &err {
            IngestError::Validation(_) => StatusCode::BAD_REQUEST,
            IngestError::NotFound(_) => StatusCode::NOT_FOUND,
            IngestError::NoData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IngestError::Transport(_) | IngestError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            IngestError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.kind(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct RecommendationView {
    #[serde(flatten)]
    recommendation: PropRecommendation,
    label: String,
    hit_rate_percent: u32,
    confidence: Confidence,
}

impl From<PropRecommendation> for RecommendationView {
    fn from(recommendation: PropRecommendation) -> Self {
        Self {
            label: recommendation.label(),
            hit_rate_percent: recommendation.hit_rate_percent(),
            confidence: recommendation.confidence(),
            recommendation,
        }
    }
}

#[derive(Debug, Serialize)]
struct RecommendationsResponse {
    games_len: usize,
    filter_active: bool,
    recommendations: Vec<RecommendationView>,
}

impl RecommendationsResponse {
    fn build(games: &[GameRecord], offered_props: &OfferedProps, filter_enabled: bool) -> Self {
        let recommendations =
            propcast_core::compute_recommendations(games, offered_props, filter_enabled);
        Self {
            games_len: games.len(),
            filter_active: filter_enabled && !offered_props.is_empty(),
            recommendations: recommendations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationQuery {
    #[serde(default)]
    offered_props: OfferedProps,
    #[serde(default)]
    filter_enabled: bool,
}

#[derive(Debug, Deserialize)]
struct ComputeRequest {
    games: Vec<GameRecord>,
    #[serde(default)]
    offered_props: OfferedProps,
    #[serde(default)]
    filter_enabled: bool,
}

async fn compute_recommendations(
    Json(req): Json<ComputeRequest>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    validate_game_records(&req.games).map_err(ApiError::bad_request)?;
    Ok(Json(RecommendationsResponse::build(
        &req.games,
        &req.offered_props,
        req.filter_enabled,
    )))
}

#[derive(Debug, Serialize)]
struct PlayerGames {
    player_key: PlayerKey,
    games: Vec<GameRecord>,
}

#[derive(Debug, Serialize)]
struct IngestResponse {
    player_key: PlayerKey,
    player: ProviderPlayer,
    games: Vec<GameRecord>,
}

async fn ingest_player(
    State(state): State<AppState>,
    Path(player_name): Path<String>,
) -> Result<Json<IngestResponse>, ApiError> {
    let result = propcast_core::ingest::ingest_last_five_games(
        state.provider.as_ref(),
        state.store.as_ref(),
        &player_name,
    )
    .await;

    if let Some(pool) = &state.pool {
        if let Err(e) = propcast_core::storage::ingest_runs::record_ingest_run(
            pool,
            &player_name,
            state.provider.provider_name(),
            &result,
        )
        .await
        {
            sentry_anyhow::capture_anyhow(&e);
            tracing::warn!(error = %e, "failed to record ingest run");
        }
    }

    match result {
        Ok(outcome) => Ok(Json(IngestResponse {
            player_key: outcome.player_key,
            player: outcome.player,
            games: outcome.games,
        })),
        Err(err) => {
            tracing::warn!(%player_name, kind = err.kind(), error = %err, "ingestion failed");
            Err(err.into())
        }
    }
}

async fn load_games(state: &AppState, player_name: &str) -> Result<(PlayerKey, Vec<GameRecord>), ApiError> {
    let key = PlayerKey::parse(player_name).map_err(ApiError::bad_request)?;
    let games = state
        .store
        .fetch(&key)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("no games stored for {key}; ingest the player first"),
            )
        })?;
    Ok((key, games))
}

async fn get_player_games(
    State(state): State<AppState>,
    Path(player_name): Path<String>,
) -> Result<Json<PlayerGames>, ApiError> {
    let (player_key, games) = load_games(&state, &player_name).await?;
    Ok(Json(PlayerGames { player_key, games }))
}

async fn put_player_games(
    State(state): State<AppState>,
    Path(player_name): Path<String>,
    Json(mut games): Json<Vec<GameRecord>>,
) -> Result<Json<PlayerGames>, ApiError> {
    let player_key = PlayerKey::parse(&player_name).map_err(ApiError::bad_request)?;
    validate_game_records(&games).map_err(ApiError::bad_request)?;
    order_most_recent_first(&mut games);

    state
        .store
        .store(&player_key, &games)
        .await
        .map_err(ApiError::internal)?;

    tracing::info!(%player_key, games_len = games.len(), "stored games from request");
    Ok(Json(PlayerGames { player_key, games }))
}

async fn get_player_recommendations(
    State(state): State<AppState>,
    Path(player_name): Path<String>,
    Json(query): Json<RecommendationQuery>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let (_, games) = load_games(&state, &player_name).await?;
    Ok(Json(RecommendationsResponse::build(
        &games,
        &query.offered_props,
        query.filter_enabled,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use propcast_core::ingest::types::{StatRow, StatsResponse};
    use propcast_core::storage::memory::MemoryGameStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct StubProvider {
        players: Vec<ProviderPlayer>,
    }

    #[async_trait::async_trait]
    impl StatsProvider for StubProvider {
        fn provider_name(&self) -> &'static str {
            "stub"
        }

        async fn search_players(&self, _name: &str) -> Result<Vec<ProviderPlayer>, IngestError> {
            Ok(self.players.clone())
        }

        async fn fetch_stat_rows(&self, _id: i64) -> Result<(Vec<StatRow>, Value), IngestError> {
            let rows: Vec<_> = [(30, "2026-01-05"), (28, "2026-01-04"), (25, "2026-01-03"), (22, "2026-01-02"), (18, "2026-01-01")]
                .into_iter()
                .map(|(pts, date)| {
                    json!({
                        "pts": pts, "reb": 6, "ast": 4, "fg3m": 1,
                        "game": {
                            "date": date,
                            "home_team": {"abbreviation": "LAL"},
                            "visitor_team": {"abbreviation": "BOS"}
                        },
                        "team": {"abbreviation": "LAL"}
                    })
                })
                .collect();
            let raw = json!({"data": rows});
            let parsed: StatsResponse = serde_json::from_value(raw.clone()).unwrap();
            Ok((parsed.data, raw))
        }
    }

    fn app(players: Vec<ProviderPlayer>) -> Router {
        router(AppState {
            store: Arc::new(MemoryGameStore::new()),
            provider: Arc::new(StubProvider { players }),
            pool: None,
        })
    }

    fn lebron() -> Vec<ProviderPlayer> {
        vec![ProviderPlayer {
            id: 237,
            first_name: "LeBron".to_string(),
            last_name: "James".to_string(),
        }]
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let app = app(vec![]);
        let res = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ingest_then_query_recommendations() {
        let app = app(lebron());

        let (status, body) = send(&app, "POST", "/players/LeBron%20James/ingest", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["player_key"], "lebron james");
        assert_eq!(body["games"].as_array().unwrap().len(), 5);

        let (status, body) = send(&app, "GET", "/players/lebron%20james/games", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["games"][0]["points"], 30);

        let (status, body) = send(
            &app,
            "POST",
            "/players/LeBron%20James/recommendations",
            Some(json!({"offered_props": [{"prop_type": "Points", "threshold": 15}], "filter_enabled": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filter_active"], true);
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["prop_type"], "points");
        assert_eq!(recs[0]["threshold"], 15);
        assert_eq!(recs[0]["hits"], 5);
        assert_eq!(recs[0]["label"], "Points 15+");
        assert_eq!(recs[0]["confidence"], "very_high");
    }

    #[tokio::test]
    async fn unknown_player_is_not_found() {
        let app = app(vec![]);
        let (status, body) = send(&app, "POST", "/players/Nobody%20Here/ingest", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");

        let (status, _) = send(&app, "GET", "/players/Nobody%20Here/games", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn short_name_is_rejected() {
        let app = app(lebron());
        let (status, body) = send(&app, "POST", "/players/J/ingest", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn put_games_caps_at_five() {
        let app = app(vec![]);
        let game = json!({"date": "2026-01-01", "opponent": "BOS", "points": 10, "rebounds": 2, "assists": 3, "threes_made": 1});
        let six: Vec<_> = (0..6).map(|_| game.clone()).collect();

        let (status, _) = send(&app, "PUT", "/players/Luka/games", Some(json!(six))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "PUT", "/players/Luka/games", Some(json!([game]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["player_key"], "luka");
    }

    #[tokio::test]
    async fn put_games_are_stored_newest_first() {
        let app = app(vec![]);
        let game = |date: &str, points: u32| {
            json!({"date": date, "opponent": "BOS", "points": points, "rebounds": 2, "assists": 3, "threes_made": 1})
        };
        let games = json!([game("2026-01-02", 12), game("2026-01-06", 31), game("2026-01-04", 25)]);

        let (status, body) = send(&app, "PUT", "/players/Luka/games", Some(games)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["games"][0]["points"], 31);

        let (_, body) = send(&app, "GET", "/players/Luka/games", None).await;
        let points: Vec<_> = body["games"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["points"].as_u64().unwrap())
            .collect();
        assert_eq!(points, vec![31, 25, 12]);
    }

    #[tokio::test]
    async fn pure_compute_handles_empty_games() {
        let app = app(vec![]);
        let (status, body) = send(&app, "POST", "/recommendations", Some(json!({"games": []}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["games_len"], 0);
        assert_eq!(body["recommendations"], json!([]));
    }
}
