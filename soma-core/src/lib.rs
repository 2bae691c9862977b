//! soma-core: domain model for SOMA A/B-test analytics
//!
//! Read-only projections of the experiment's reporting views, plus the two
//! pieces of logic computed in-process: the A/B comparison and leaderboard
//! ranking. Nothing here performs I/O.

pub mod comparison;
pub mod leaderboard;
pub mod limit;
pub mod stats;
pub mod validation;
pub mod variant;

pub use comparison::{
    compare_variants, ComparisonError, ComparisonOutcome, ComparisonResult, Interpretation,
};
pub use leaderboard::{rank_leaderboard, BestTime, LeaderboardEntry};
pub use limit::{
    deserialize_requested_limit, parse_saturating, Limit, LimitBounds, LEADERBOARD_LIMIT,
    RECENT_COMPLETIONS_LIMIT,
};
pub use stats::{CompletionEvent, FunnelStage, Stage, TimeDistribution, VariantStat};
pub use validation::ValidationError;
pub use variant::Variant;
