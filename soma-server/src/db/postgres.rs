//! Postgres implementation of [`AnalyticsStore`]
//!
//! Reads from:
//! - `v_variant_stats`, `v_conversion_funnel`: views maintained outside this repo
//! - `posthog_events`: raw product events, filtered to `puzzle_completed`

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use soma_core::{
    BestTime, CompletionEvent, FunnelStage, Limit, Stage, TimeDistribution, Variant, VariantStat,
};

use super::pool::LazyPool;
use super::store::{AnalyticsStore, StoreError};

const VARIANT_STATS_SQL: &str = r#"
    SELECT
        variant::text                       AS variant,
        total_completions::int8             AS total_completions,
        unique_users::int8                  AS unique_users,
        avg_completion_time::float8         AS avg_completion_time,
        median_completion_time::float8      AS median_completion_time,
        min_completion_time::float8         AS min_completion_time,
        max_completion_time::float8         AS max_completion_time,
        p25_completion_time::float8         AS p25_completion_time,
        p75_completion_time::float8         AS p75_completion_time,
        p90_completion_time::float8         AS p90_completion_time,
        p95_completion_time::float8         AS p95_completion_time
    FROM v_variant_stats
    ORDER BY variant
"#;

const CONVERSION_FUNNEL_SQL: &str = r#"
    SELECT
        variant::text           AS variant,
        stage::text             AS stage,
        stage_order::int4       AS stage_order,
        event_count::int8       AS event_count,
        unique_users::int8      AS unique_users
    FROM v_conversion_funnel
    ORDER BY variant, stage_order
"#;

const RECENT_COMPLETIONS_SQL: &str = r#"
    SELECT
        variant::text                       AS variant,
        completion_time_seconds::float8     AS completion_time_seconds,
        correct_words_count::int8           AS correct_words_count,
        total_guesses_count::int8           AS total_guesses_count,
        "timestamp"::timestamptz            AS timestamp,
        user_id::text                       AS user_id,
        country::text                       AS country
    FROM posthog_events
    WHERE event = 'puzzle_completed'
      AND completion_time_seconds IS NOT NULL
      AND variant IS NOT NULL
    ORDER BY "timestamp" DESC
    LIMIT $1
"#;

const TIME_DISTRIBUTION_SQL: &str = r#"
    SELECT
        variant::text                       AS variant,
        completion_time_seconds::float8     AS completion_time_seconds
    FROM posthog_events
    WHERE event = 'puzzle_completed'
      AND completion_time_seconds IS NOT NULL
      AND variant IN ('A', 'B')
    ORDER BY "timestamp"
"#;

// DISTINCT ON keeps the first row per user under the inner ORDER BY, i.e.
// the fastest time and, among equal times, the earliest.
const BEST_TIMES_SQL: &str = r#"
    SELECT user_id, completion_time_seconds, achieved_at
    FROM (
        SELECT DISTINCT ON (user_id)
            user_id::text                       AS user_id,
            completion_time_seconds::float8     AS completion_time_seconds,
            "timestamp"::timestamptz            AS achieved_at
        FROM posthog_events
        WHERE event = 'puzzle_completed'
          AND completion_time_seconds IS NOT NULL
          AND user_id IS NOT NULL
          AND variant = $1
        ORDER BY user_id, completion_time_seconds ASC, achieved_at ASC
    ) best
    ORDER BY completion_time_seconds ASC, achieved_at ASC
    LIMIT $2
"#;

/// Analytics store backed by Postgres
pub struct PgAnalyticsStore {
    pool: LazyPool,
}

impl PgAnalyticsStore {
    pub fn new(pool: LazyPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        self.pool.get()
    }

    /// Close pooled connections (used on shutdown).
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn variant_stat_from_row(row: &PgRow) -> Result<VariantStat, StoreError> {
    Ok(VariantStat {
        variant: row.try_get("variant")?,
        total_completions: row.try_get("total_completions")?,
        unique_users: row.try_get("unique_users")?,
        avg_completion_time: row.try_get("avg_completion_time")?,
        median_completion_time: row.try_get("median_completion_time")?,
        min_completion_time: row.try_get("min_completion_time")?,
        max_completion_time: row.try_get("max_completion_time")?,
        p25_completion_time: row.try_get("p25_completion_time")?,
        p75_completion_time: row.try_get("p75_completion_time")?,
        p90_completion_time: row.try_get("p90_completion_time")?,
        p95_completion_time: row.try_get("p95_completion_time")?,
    })
}

fn funnel_stage_from_row(row: &PgRow) -> Result<FunnelStage, StoreError> {
    let stage = parse_stage(row.try_get("stage")?, row.try_get("stage_order")?)?;

    Ok(FunnelStage {
        variant: row.try_get("variant")?,
        stage,
        stage_order: stage.ordinal(),
        event_count: row.try_get("event_count")?,
        unique_users: row.try_get("unique_users")?,
    })
}

/// Decode a stage name and check the view's ordinal agrees with it.
fn parse_stage(name: String, stage_order: i32) -> Result<Stage, StoreError> {
    let stage = name
        .parse::<Stage>()
        .map_err(|value| StoreError::UnexpectedValue {
            column: "stage",
            value,
        })?;

    if stage.ordinal() != stage_order {
        return Err(StoreError::UnexpectedValue {
            column: "stage_order",
            value: format!("{stage_order} for stage {stage}"),
        });
    }
    Ok(stage)
}

fn completion_from_row(row: &PgRow) -> Result<CompletionEvent, StoreError> {
    Ok(CompletionEvent {
        variant: row.try_get("variant")?,
        completion_time_seconds: row.try_get("completion_time_seconds")?,
        correct_words_count: row.try_get("correct_words_count")?,
        total_guesses_count: row.try_get("total_guesses_count")?,
        timestamp: row.try_get("timestamp")?,
        user_id: row.try_get("user_id")?,
        country: row.try_get("country")?,
    })
}

fn best_time_from_row(row: &PgRow) -> Result<BestTime, StoreError> {
    Ok(BestTime {
        user_id: row.try_get("user_id")?,
        completion_time_seconds: row.try_get("completion_time_seconds")?,
        achieved_at: row.try_get("achieved_at")?,
    })
}

#[async_trait]
impl AnalyticsStore for PgAnalyticsStore {
    async fn variant_stats(&self) -> Result<Vec<VariantStat>, StoreError> {
        tracing::debug!("querying v_variant_stats");
        let rows = sqlx::query(VARIANT_STATS_SQL).fetch_all(self.pool()).await?;
        rows.iter().map(variant_stat_from_row).collect()
    }

    async fn conversion_funnel(&self) -> Result<Vec<FunnelStage>, StoreError> {
        tracing::debug!("querying v_conversion_funnel");
        let rows = sqlx::query(CONVERSION_FUNNEL_SQL)
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(funnel_stage_from_row).collect()
    }

    async fn recent_completions(&self, limit: Limit) -> Result<Vec<CompletionEvent>, StoreError> {
        tracing::debug!(limit = limit.get(), "querying recent completions");
        let rows = sqlx::query(RECENT_COMPLETIONS_SQL)
            .bind(limit.as_i64())
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(completion_from_row).collect()
    }

    async fn completion_time_distribution(&self) -> Result<TimeDistribution, StoreError> {
        tracing::debug!("querying completion time distribution");
        let mut rows = sqlx::query(TIME_DISTRIBUTION_SQL).fetch(self.pool());

        let mut distribution = TimeDistribution::default();
        while let Some(row) = rows.try_next().await? {
            let variant: String = row.try_get("variant")?;
            distribution.push(&variant, row.try_get("completion_time_seconds")?);
        }

        tracing::debug!(
            variant_a = distribution.variant_a.len(),
            variant_b = distribution.variant_b.len(),
            "completion time distribution loaded"
        );
        Ok(distribution)
    }

    async fn best_times(&self, variant: Variant, limit: Limit) -> Result<Vec<BestTime>, StoreError> {
        tracing::debug!(%variant, limit = limit.get(), "querying best times");
        let rows = sqlx::query(BEST_TIMES_SQL)
            .bind(variant.as_str())
            .bind(limit.as_i64())
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(best_time_from_row).collect()
    }
}
