//! soma-server: read-only JSON API for SOMA A/B-test analytics
//!
//! Queries the pre-aggregated reporting views and the completion event
//! table, and serves the results over HTTP. All heavy aggregation lives in
//! the database; this crate validates input, retries transient store
//! failures, and formats.

pub mod config;
pub mod db;
pub mod http;
pub mod report;
pub mod retry;

pub use config::{ConfigError, DatabaseConfig, PoolSettings, ServerConfig};
pub use db::{AnalyticsStore, LazyPool, PgAnalyticsStore, StoreError};
pub use http::{build_router, run_server, ApiError, AppState, ServerError};
pub use report::Report;
pub use retry::{retry, RetryPolicy};
