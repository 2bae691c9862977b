//! soma-analytics CLI - read-only A/B-test analytics for SOMA
//!
//! Entry point for:
//! - `serve`: the JSON API over the reporting views
//! - `report`: one-shot stats, funnel, and comparison printed as JSON

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "soma-analytics",
    author,
    version,
    about = "Read-only analytics API for SOMA A/B tests",
    long_about = "Serves pre-aggregated A/B-test metrics (completion times, funnels, \
                  leaderboards) from Postgres reporting views as JSON over HTTP."
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces to an OTLP endpoint (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Print variant stats, funnel, and comparison as JSON
    Report(commands::report::ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing: clap reads DATABASE_URL and friends from the environment.
    let env_sources = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();
    config::log_env_sources(&env_sources);

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Report(args) => commands::run_report(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
