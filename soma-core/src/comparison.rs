//! A/B comparison derived from the two `VariantStat` rows
//!
//! The difference is always B relative to A: a positive percentage means
//! players on B took longer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Variant, VariantStat};

/// Absolute percentage above which the difference is "significant"
const SIGNIFICANT_PCT: f64 = 20.0;

/// Absolute percentage above which the difference is "moderate"
const MODERATE_PCT: f64 = 10.0;

/// Why a comparison could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComparisonError {
    /// Fewer than two variant rows exist
    #[error("Need data from both variants for comparison")]
    InsufficientData,

    /// Two or more rows exist but A or B is absent (or has no average)
    #[error("Missing data for variant A or B")]
    MissingVariantData,
}

impl ComparisonError {
    /// Stable machine-readable code for the JSON payload.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::MissingVariantData => "missing_variant_data",
        }
    }
}

/// Qualitative reading of the percentage difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    SignificantlyHarder,
    SurprisinglyEasier,
    ModerateDifference,
    SimilarDifficulty,
}

impl Interpretation {
    pub fn from_percentage(pct: f64) -> Self {
        if pct.abs() > SIGNIFICANT_PCT {
            if pct > 0.0 {
                Self::SignificantlyHarder
            } else {
                Self::SurprisinglyEasier
            }
        } else if pct.abs() > MODERATE_PCT {
            Self::ModerateDifference
        } else {
            Self::SimilarDifficulty
        }
    }

    /// Display text shown on the dashboard, severity marker first.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SignificantlyHarder => "🔴 Variant B is significantly harder (+20% time)",
            Self::SurprisinglyEasier => "🟢 Variant B is surprisingly easier (-20% time)",
            Self::ModerateDifference => "🟡 Moderate difficulty difference (10-20%)",
            Self::SimilarDifficulty => "⚪ Similar difficulty (<10% difference)",
        }
    }
}

/// Variant B measured against variant A
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub time_difference_seconds: f64,
    pub percentage_difference: f64,
    pub interpretation: Interpretation,
    pub interpretation_label: String,
    pub variant_a_avg: f64,
    pub variant_b_avg: f64,
    pub variant_a_median: Option<f64>,
    pub variant_b_median: Option<f64>,
    pub variant_a_completions: i64,
    pub variant_b_completions: i64,
}

/// Compare variant B against variant A.
///
/// # Errors
///
/// - [`ComparisonError::InsufficientData`] when fewer than two rows are given
/// - [`ComparisonError::MissingVariantData`] when A or B is absent or has no
///   average completion time
///
/// A zero (or negative) average for A yields a percentage difference of 0
/// rather than a division error.
pub fn compare_variants(stats: &[VariantStat]) -> Result<ComparisonResult, ComparisonError> {
    if stats.len() < 2 {
        return Err(ComparisonError::InsufficientData);
    }

    let find = |variant: Variant| stats.iter().find(|s| s.variant == variant.as_str());
    let (a, b) = match (find(Variant::A), find(Variant::B)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(ComparisonError::MissingVariantData),
    };
    let (a_avg, b_avg) = match (a.avg_completion_time, b.avg_completion_time) {
        (Some(a_avg), Some(b_avg)) => (a_avg, b_avg),
        _ => return Err(ComparisonError::MissingVariantData),
    };

    let time_diff = b_avg - a_avg;
    let pct_diff = if a_avg > 0.0 {
        time_diff / a_avg * 100.0
    } else {
        0.0
    };
    let interpretation = Interpretation::from_percentage(pct_diff);

    Ok(ComparisonResult {
        time_difference_seconds: round_to(time_diff, 2),
        percentage_difference: round_to(pct_diff, 1),
        interpretation,
        interpretation_label: interpretation.label().to_owned(),
        variant_a_avg: round_to(a_avg, 2),
        variant_b_avg: round_to(b_avg, 2),
        variant_a_median: a.median_completion_time.map(|m| round_to(m, 2)),
        variant_b_median: b.median_completion_time.map(|m| round_to(m, 2)),
        variant_a_completions: a.total_completions,
        variant_b_completions: b.total_completions,
    })
}

/// Comparison as returned to clients: either the result or a structured
/// "cannot compare" payload. Never an error status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComparisonOutcome {
    Compared(ComparisonResult),
    Unavailable { error: &'static str, message: String },
}

impl From<Result<ComparisonResult, ComparisonError>> for ComparisonOutcome {
    fn from(result: Result<ComparisonResult, ComparisonError>) -> Self {
        match result {
            Ok(comparison) => Self::Compared(comparison),
            Err(e) => Self::Unavailable {
                error: e.code(),
                message: e.to_string(),
            },
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
