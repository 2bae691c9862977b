//! In-memory store for exercising the HTTP layer without Postgres

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use soma_core::{BestTime, CompletionEvent, FunnelStage, Limit, Stage, TimeDistribution, Variant, VariantStat};
use soma_server::{AnalyticsStore, RetryPolicy, StoreError};

/// How the fake fails before (or instead of) answering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Fail with a transient (connection) error this many times, then succeed
    TransientTimes(usize),
    /// Always fail with a transient error
    Unreachable,
    /// Always fail with a non-transient error
    Broken,
}

#[derive(Default)]
pub struct FakeStore {
    pub stats: Vec<VariantStat>,
    pub funnel: Vec<FunnelStage>,
    pub completions: Vec<CompletionEvent>,
    pub distribution: TimeDistribution,
    pub best: Vec<BestTime>,
    pub failure: Option<Failure>,
    pub failures_left: AtomicUsize,
    pub calls: AtomicUsize,
    pub last_limit: Mutex<Option<Limit>>,
    pub last_variant: Mutex<Option<Variant>>,
}

impl FakeStore {
    pub fn failing(mut self, failure: Failure) -> Self {
        if let Failure::TransientTimes(n) = failure {
            self.failures_left = AtomicUsize::new(n);
        }
        self.failure = Some(failure);
        self
    }

    /// Number of store method calls (all attempts, all methods).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_limit(&self) -> Option<Limit> {
        *self.last_limit.lock().unwrap()
    }

    pub fn last_variant(&self) -> Option<Variant> {
        *self.last_variant.lock().unwrap()
    }

    fn attempt(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            None => Ok(()),
            Some(Failure::Unreachable) => Err(sqlx::Error::PoolTimedOut.into()),
            Some(Failure::Broken) => Err(StoreError::UnexpectedValue {
                column: "stage",
                value: "Abandoned".into(),
            }),
            Some(Failure::TransientTimes(_)) => {
                let left = self.failures_left.load(Ordering::SeqCst);
                if left > 0 {
                    self.failures_left.store(left - 1, Ordering::SeqCst);
                    let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset by peer");
                    Err(sqlx::Error::Io(io).into())
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[async_trait]
impl AnalyticsStore for FakeStore {
    async fn variant_stats(&self) -> Result<Vec<VariantStat>, StoreError> {
        self.attempt()?;
        Ok(self.stats.clone())
    }

    async fn conversion_funnel(&self) -> Result<Vec<FunnelStage>, StoreError> {
        self.attempt()?;
        Ok(self.funnel.clone())
    }

    async fn recent_completions(&self, limit: Limit) -> Result<Vec<CompletionEvent>, StoreError> {
        self.attempt()?;
        *self.last_limit.lock().unwrap() = Some(limit);
        Ok(self.completions.iter().take(limit.as_usize()).cloned().collect())
    }

    async fn completion_time_distribution(&self) -> Result<TimeDistribution, StoreError> {
        self.attempt()?;
        Ok(self.distribution.clone())
    }

    // Returns every candidate regardless of limit or duplicates, so ranking
    // has to do the work.
    async fn best_times(&self, variant: Variant, limit: Limit) -> Result<Vec<BestTime>, StoreError> {
        self.attempt()?;
        *self.last_limit.lock().unwrap() = Some(limit);
        *self.last_variant.lock().unwrap() = Some(variant);
        Ok(self.best.clone())
    }
}

/// Retry policy with a short delay so tests stay fast.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(2, Duration::from_millis(5))
}

pub fn stat(variant: &str, avg: f64, completions: i64) -> VariantStat {
    VariantStat {
        variant: variant.to_owned(),
        total_completions: completions,
        unique_users: completions / 2,
        avg_completion_time: Some(avg),
        median_completion_time: Some(avg - 1.0),
        min_completion_time: Some(avg / 2.0),
        max_completion_time: Some(avg * 2.0),
        p25_completion_time: Some(avg * 0.75),
        p75_completion_time: Some(avg * 1.25),
        p90_completion_time: Some(avg * 1.5),
        p95_completion_time: Some(avg * 1.75),
    }
}

pub fn funnel_stage(variant: &str, stage: Stage, events: i64) -> FunnelStage {
    FunnelStage {
        variant: variant.to_owned(),
        stage,
        stage_order: stage.ordinal(),
        event_count: events,
        unique_users: events / 2,
    }
}

pub fn completion(i: u32) -> CompletionEvent {
    CompletionEvent {
        variant: if i % 2 == 0 { "A" } else { "B" }.to_owned(),
        completion_time_seconds: 30.0 + f64::from(i % 60),
        correct_words_count: Some(6),
        total_guesses_count: Some(10),
        timestamp: Utc.timestamp_opt(1_735_689_600 - i64::from(i) * 60, 0).unwrap(),
        user_id: Some(format!("anon-{i}")),
        country: Some("CA".into()),
    }
}

pub fn best_time(user: &str, seconds: f64, minute: u32) -> BestTime {
    BestTime {
        user_id: user.to_owned(),
        completion_time_seconds: seconds,
        achieved_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, minute, 0).unwrap(),
    }
}
