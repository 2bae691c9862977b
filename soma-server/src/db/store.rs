//! Store abstraction over the reporting views
//!
//! Each method is one read-only query intent. Implementations must be
//! side-effect free so callers can retry them blindly.

use async_trait::async_trait;
use soma_core::{
    compare_variants, rank_leaderboard, BestTime, ComparisonError, ComparisonResult,
    CompletionEvent, FunnelStage, LeaderboardEntry, Limit, TimeDistribution, Variant, VariantStat,
};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("unexpected value in column '{column}': '{value}'")]
    UnexpectedValue { column: &'static str, value: String },
}

impl StoreError {
    /// Whether retrying the same read could succeed.
    ///
    /// Connection-level failures are transient; query, decode, and data
    /// errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sqlx(e) => is_transient_sqlx(e),
            Self::UnexpectedValue { .. } => false,
        }
    }
}

fn is_transient_sqlx(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db.code().is_some_and(|code| is_transient_sqlstate(&code)),
        _ => false,
    }
}

/// SQLSTATE codes that indicate the server or the link, not the query.
fn is_transient_sqlstate(code: &str) -> bool {
    // 08xxx connection_exception, 53300 too_many_connections,
    // 57P01 admin_shutdown, 57P02 crash_shutdown, 57P03 cannot_connect_now
    code.starts_with("08") || matches!(code, "53300" | "57P01" | "57P02" | "57P03")
}

/// Read-only access to experiment analytics
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// All per-variant statistics, ordered by variant.
    async fn variant_stats(&self) -> Result<Vec<VariantStat>, StoreError>;

    /// All funnel rows, ordered by variant then stage ordinal.
    async fn conversion_funnel(&self) -> Result<Vec<FunnelStage>, StoreError>;

    /// The `limit` most recent completions, newest first.
    async fn recent_completions(&self, limit: Limit) -> Result<Vec<CompletionEvent>, StoreError>;

    /// Every recorded completion time, split by variant.
    async fn completion_time_distribution(&self) -> Result<TimeDistribution, StoreError>;

    /// Each user's best time for `variant`, fastest first, at most `limit` rows.
    async fn best_times(&self, variant: Variant, limit: Limit) -> Result<Vec<BestTime>, StoreError>;

    /// Compare B against A.
    ///
    /// The outer `Result` is the store; the inner one says whether the data
    /// supports a comparison at all.
    async fn comparison_metrics(
        &self,
    ) -> Result<Result<ComparisonResult, ComparisonError>, StoreError> {
        let stats = self.variant_stats().await?;
        Ok(compare_variants(&stats))
    }

    /// Top `limit` users by best time, one entry per user.
    async fn leaderboard(
        &self,
        variant: Variant,
        limit: Limit,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let rows = self.best_times(variant, limit).await?;
        Ok(rank_leaderboard(rows, variant, limit))
    }
}
