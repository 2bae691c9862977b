//! One-shot analytics report
//!
//! The same data the dashboard pulls from the API, gathered in one pass for
//! command-line inspection.

use serde::Serialize;

use soma_core::{compare_variants, ComparisonOutcome, FunnelStage, VariantStat};

use crate::db::{AnalyticsStore, StoreError};
use crate::retry::{retry, RetryPolicy};

/// Variant stats, funnel, and the derived comparison
#[derive(Debug, Serialize)]
pub struct Report {
    pub variant_stats: Vec<VariantStat>,
    pub conversion_funnel: Vec<FunnelStage>,
    pub comparison: ComparisonOutcome,
}

impl Report {
    /// Gather the report. The comparison is computed from the same stats
    /// rows shown in the report rather than a second query.
    pub async fn gather(store: &dyn AnalyticsStore, policy: &RetryPolicy) -> Result<Self, StoreError> {
        let variant_stats = retry(policy, StoreError::is_transient, || store.variant_stats()).await?;
        let conversion_funnel =
            retry(policy, StoreError::is_transient, || store.conversion_funnel()).await?;
        let comparison = ComparisonOutcome::from(compare_variants(&variant_stats));

        Ok(Self {
            variant_stats,
            conversion_funnel,
            comparison,
        })
    }
}
