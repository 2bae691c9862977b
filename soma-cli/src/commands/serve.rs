//! HTTP server command
//!
//! Runs the read-only analytics API over the reporting views.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use soma_server::{
    run_server, AppState, DatabaseConfig, LazyPool, PgAnalyticsStore, RetryPolicy, ServerConfig,
};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:$PORT, PORT defaults to 8000)
    #[arg(long, short = 'b', env = "SOMA_BIND")]
    pub bind: Option<SocketAddr>,

    /// Postgres connection string (overrides config/environment)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = DatabaseConfig::from_url(args.database_url.as_deref()).context(
        "DATABASE_URL not usable. Set via --database-url, DATABASE_URL env, or ~/.soma-analytics/.env",
    )?;

    let server_config = match args.bind {
        Some(bind_addr) => ServerConfig { bind_addr },
        None => ServerConfig::from_env().context("Failed to read PORT")?,
    };

    tracing::info!(
        bind = %server_config.bind_addr,
        max_connections = db_config.pool.max_connections(),
        "Starting soma-analytics server"
    );

    // Connections open on first query, so startup never touches the database.
    let store = Arc::new(PgAnalyticsStore::new(LazyPool::new(db_config)));
    let state = AppState::new(store.clone(), RetryPolicy::default());

    let served = run_server(state, server_config).await;
    store.close().await;

    served.context("Server error")
}
