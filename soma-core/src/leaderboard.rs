//! Leaderboard ranking
//!
//! Ordering: fastest time first; equal times go to whoever got there first.
//! Each user appears at most once, with their best time.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Limit, Variant};

/// A user's completion time candidate for the leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct BestTime {
    pub user_id: String,
    pub completion_time_seconds: f64,
    pub achieved_at: DateTime<Utc>,
}

/// Ranked leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: u32,
    pub user_id: String,
    pub variant: Variant,
    pub best_time_seconds: f64,
    pub achieved_at: DateTime<Utc>,
}

/// Rank candidate rows into at most `limit` entries, one per user.
pub fn rank_leaderboard(
    mut rows: Vec<BestTime>,
    variant: Variant,
    limit: Limit,
) -> Vec<LeaderboardEntry> {
    rows.sort_by(|a, b| {
        a.completion_time_seconds
            .total_cmp(&b.completion_time_seconds)
            .then(a.achieved_at.cmp(&b.achieved_at))
    });

    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.user_id.clone()))
        .take(limit.as_usize())
        .zip(1u32..)
        .map(|(row, rank)| LeaderboardEntry {
            rank,
            user_id: row.user_id,
            variant,
            best_time_seconds: row.completion_time_seconds,
            achieved_at: row.achieved_at,
        })
        .collect()
}
