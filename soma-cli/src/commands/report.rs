//! One-shot report command
//!
//! Prints variant stats, the conversion funnel and the A/B comparison as a
//! single JSON document on stdout.

use anyhow::{Context, Result};
use clap::Parser;

use soma_server::{DatabaseConfig, LazyPool, PgAnalyticsStore, Report, RetryPolicy};

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Postgres connection string (overrides config/environment)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

pub async fn run_report(args: ReportArgs) -> Result<()> {
    let db_config = DatabaseConfig::from_url(args.database_url.as_deref()).context(
        "DATABASE_URL not usable. Set via --database-url, DATABASE_URL env, or ~/.soma-analytics/.env",
    )?;

    let store = PgAnalyticsStore::new(LazyPool::new(db_config));
    let gathered = Report::gather(&store, &RetryPolicy::default()).await;
    store.close().await;
    let report = gathered.context("Failed to query analytics views")?;

    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");

    Ok(())
}
