//! Data access layer - connection pool and the analytics store
//!
//! # Design Principles
//!
//! - One process-wide pool, built on first use - no module-level singleton
//! - Every query is read-only and parameterized
//! - Numeric columns are cast in SQL so decoding does not depend on view types
//! - Ranking and comparison are pure functions over query results (soma-core)

pub mod pool;
pub mod postgres;
pub mod store;

pub use pool::LazyPool;
pub use postgres::PgAnalyticsStore;
pub use store::{AnalyticsStore, StoreError};
