//! Analytics endpoints
//!
//! Every store call is wrapped in the state's retry policy. Parameters are
//! validated and clamped before the store is touched.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use soma_core::{
    deserialize_requested_limit, ComparisonOutcome, CompletionEvent, FunnelStage,
    LeaderboardEntry, Limit, TimeDistribution, Variant, VariantStat, LEADERBOARD_LIMIT,
    RECENT_COMPLETIONS_LIMIT,
};

use crate::db::StoreError;
use crate::http::error::ApiError;
use crate::http::extractors::ValidQuery;
use crate::http::server::AppState;
use crate::retry::retry;

/// Query parameters for `/api/recent-completions`
#[derive(Debug, Default, Deserialize)]
pub struct RecentCompletionsParams {
    #[serde(default, deserialize_with = "deserialize_requested_limit")]
    pub limit: Option<i64>,
}

/// Query parameters for `/api/leaderboard`
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    pub variant: Option<String>,
    #[serde(default, deserialize_with = "deserialize_requested_limit")]
    pub limit: Option<i64>,
}

/// GET /api/variant-stats
async fn variant_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VariantStat>>, ApiError> {
    let stats = retry(&state.retry, StoreError::is_transient, || {
        state.store.variant_stats()
    })
    .await?;
    Ok(Json(stats))
}

/// GET /api/conversion-funnel
async fn conversion_funnel(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FunnelStage>>, ApiError> {
    let funnel = retry(&state.retry, StoreError::is_transient, || {
        state.store.conversion_funnel()
    })
    .await?;
    Ok(Json(funnel))
}

/// GET /api/recent-completions?limit=N (default 100, clamped to 1..=500)
async fn recent_completions(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<RecentCompletionsParams>,
) -> Result<Json<Vec<CompletionEvent>>, ApiError> {
    let limit = Limit::clamped(params.limit, RECENT_COMPLETIONS_LIMIT);
    let events = retry(&state.retry, StoreError::is_transient, || {
        state.store.recent_completions(limit)
    })
    .await?;
    Ok(Json(events))
}

/// GET /api/comparison
///
/// Insufficient data is a 200 with an `error` payload, not a failure.
async fn comparison(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ComparisonOutcome>, ApiError> {
    let outcome = retry(&state.retry, StoreError::is_transient, || {
        state.store.comparison_metrics()
    })
    .await?;
    Ok(Json(ComparisonOutcome::from(outcome)))
}

/// GET /api/time-distribution
async fn time_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimeDistribution>, ApiError> {
    let distribution = retry(&state.retry, StoreError::is_transient, || {
        state.store.completion_time_distribution()
    })
    .await?;
    Ok(Json(distribution))
}

/// GET /api/leaderboard?variant=A|B&limit=N (default A, 10; clamped to 1..=50)
async fn leaderboard(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let variant = params
        .variant
        .as_deref()
        .map(str::parse::<Variant>)
        .transpose()?
        .unwrap_or_default();
    let limit = Limit::clamped(params.limit, LEADERBOARD_LIMIT);

    let entries = retry(&state.retry, StoreError::is_transient, || {
        state.store.leaderboard(variant, limit)
    })
    .await?;
    Ok(Json(entries))
}

/// Analytics routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/variant-stats", get(variant_stats))
        .route("/api/conversion-funnel", get(conversion_funnel))
        .route("/api/recent-completions", get(recent_completions))
        .route("/api/comparison", get(comparison))
        .route("/api/time-distribution", get(time_distribution))
        .route("/api/leaderboard", get(leaderboard))
}
