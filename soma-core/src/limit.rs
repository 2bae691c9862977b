//! Row limits for list endpoints
//!
//! Out-of-range requests are clamped, never rejected. That includes integers
//! too wide for `i64`: they saturate before clamping.

use serde::{Deserialize, Deserializer};

/// Accepted range and default for one endpoint's `limit` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitBounds {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

/// `/api/recent-completions`
pub const RECENT_COMPLETIONS_LIMIT: LimitBounds = LimitBounds {
    min: 1,
    max: 500,
    default: 100,
};

/// `/api/leaderboard`
pub const LEADERBOARD_LIMIT: LimitBounds = LimitBounds {
    min: 1,
    max: 50,
    default: 10,
};

/// A row limit already clamped into its endpoint's bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Limit(u32);

impl Limit {
    /// Clamp a caller-supplied limit.
    ///
    /// - `None` falls back to `bounds.default`
    /// - Values below `bounds.min` (including negatives) become `bounds.min`
    /// - Values above `bounds.max` become `bounds.max`
    pub fn clamped(requested: Option<i64>, bounds: LimitBounds) -> Self {
        let value = requested
            .unwrap_or(i64::from(bounds.default))
            .clamp(i64::from(bounds.min), i64::from(bounds.max));
        // In range of u32 after the clamp above.
        Self(value as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Value for binding into a SQL `LIMIT` parameter.
    pub fn as_i64(self) -> i64 {
        i64::from(self.0)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Parse a base-10 integer, saturating to `i64::MIN`/`i64::MAX` when the
/// digits overflow. Returns `None` for anything that is not an integer.
pub fn parse_saturating(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let saturated = if negative { i64::MIN } else { i64::MAX };
    Some(raw.parse::<i64>().unwrap_or(saturated))
}

/// `deserialize_with` helper for an optional `limit` query parameter.
///
/// Use with `#[serde(default)]` so an absent parameter stays `None`.
pub fn deserialize_requested_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_saturating(&raw).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("limit: expected an integer, got '{raw}'"))
        }),
    }
}
