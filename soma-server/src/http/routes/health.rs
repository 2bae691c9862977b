//! Service metadata and health check

use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

const SERVICE_NAME: &str = "SOMA Analytics API";

/// Every data endpoint, as listed by `GET /`
pub const API_ENDPOINTS: &[&str] = &[
    "/api/variant-stats",
    "/api/conversion-funnel",
    "/api/recent-completions",
    "/api/comparison",
    "/api/time-distribution",
    "/api/leaderboard",
];

/// Service metadata response
#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// GET /
async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        description: "Real-time analytics for SOMA projects",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: API_ENDPOINTS,
    })
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}

/// Health routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}
