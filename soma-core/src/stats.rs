//! Records read from the reporting views and the event table
//!
//! All of these are request-scoped projections: built once from a query
//! result, serialized, dropped.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Variant;

/// Aggregated completion statistics for one variant (`v_variant_stats`)
///
/// Timing fields are seconds. They are nullable because the view computes
/// them with aggregates that yield NULL over an empty set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStat {
    pub variant: String,
    pub total_completions: i64,
    pub unique_users: i64,
    pub avg_completion_time: Option<f64>,
    pub median_completion_time: Option<f64>,
    pub min_completion_time: Option<f64>,
    pub max_completion_time: Option<f64>,
    pub p25_completion_time: Option<f64>,
    pub p75_completion_time: Option<f64>,
    pub p90_completion_time: Option<f64>,
    pub p95_completion_time: Option<f64>,
}

/// Named step of the conversion funnel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Started,
    Completed,
    Repeated,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "Started",
            Self::Completed => "Completed",
            Self::Repeated => "Repeated",
        }
    }

    /// Sort position within the funnel (1-based, matches `stage_order`).
    pub fn ordinal(&self) -> i32 {
        match self {
            Self::Started => 1,
            Self::Completed => 2,
            Self::Repeated => 3,
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Started" => Ok(Self::Started),
            "Completed" => Ok(Self::Completed),
            "Repeated" => Ok(Self::Repeated),
            other => Err(other.to_owned()),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (variant, stage) row of `v_conversion_funnel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    pub variant: String,
    pub stage: Stage,
    pub stage_order: i32,
    pub event_count: i64,
    pub unique_users: i64,
}

/// A single `puzzle_completed` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub variant: String,
    pub completion_time_seconds: f64,
    pub correct_words_count: Option<i64>,
    pub total_guesses_count: Option<i64>,
    pub timestamp: DateTime<Utc>,
    /// Anonymous distinct id, never a real identity
    pub user_id: Option<String>,
    /// Coarse location (country code) when the event carried one
    pub country: Option<String>,
}

/// Raw completion times split by variant, for client-side histograms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeDistribution {
    pub variant_a: Vec<f64>,
    pub variant_b: Vec<f64>,
}

impl TimeDistribution {
    /// Append one observation. Returns `false` (and drops the value) for
    /// codes other than `A`/`B`.
    pub fn push(&mut self, variant: &str, seconds: f64) -> bool {
        match variant.parse::<Variant>() {
            Ok(Variant::A) => self.variant_a.push(seconds),
            Ok(Variant::B) => self.variant_b.push(seconds),
            Err(_) => return false,
        }
        true
    }

    pub fn len(&self) -> usize {
        self.variant_a.len() + self.variant_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(String, f64)> for TimeDistribution {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut dist = Self::default();
        for (variant, seconds) in iter {
            dist.push(&variant, seconds);
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ordinals_follow_funnel_order() {
        let stages: Vec<Stage> = ["Started", "Completed", "Repeated"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let ordinals: Vec<i32> = stages.iter().map(Stage::ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn unknown_stage_is_rejected() {
        assert_eq!("Abandoned".parse::<Stage>().unwrap_err(), "Abandoned");
    }

    #[test]
    fn distribution_partitions_by_variant() {
        let dist: TimeDistribution = vec![
            ("A".to_string(), 10.0),
            ("B".to_string(), 20.0),
            ("A".to_string(), 11.5),
            ("Z".to_string(), 99.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(dist.variant_a, vec![10.0, 11.5]);
        assert_eq!(dist.variant_b, vec![20.0]);
        assert_eq!(dist.len(), 3);
    }

    #[test]
    fn completion_timestamp_serializes_as_rfc3339() {
        let event = CompletionEvent {
            variant: "A".into(),
            completion_time_seconds: 42.5,
            correct_words_count: Some(6),
            total_guesses_count: Some(9),
            timestamp: DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
            user_id: Some("anon-1".into()),
            country: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["timestamp"], "2025-01-02T03:04:05Z");
        assert_eq!(json["country"], serde_json::Value::Null);
    }
}
