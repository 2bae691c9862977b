//! Database connection pool management
//!
//! The pool is owned by the store and created the first time a query needs
//! it. Creation itself opens no connections (`connect_lazy_with`); sqlx opens
//! them on demand, pings them before reuse, and recycles them after
//! [`PoolSettings::recycle_after`].

use std::sync::OnceLock;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::{DatabaseConfig, PoolSettings};

/// Postgres pool built at most once, on first use.
pub struct LazyPool {
    connect: PgConnectOptions,
    settings: PoolSettings,
    pool: OnceLock<PgPool>,
}

impl LazyPool {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            connect: config.connect,
            settings: config.pool,
            pool: OnceLock::new(),
        }
    }

    /// Get the pool, building it on the first call.
    ///
    /// Must be called from within a Tokio runtime: sqlx spawns the pool's
    /// maintenance task when the pool is built.
    pub fn get(&self) -> &PgPool {
        self.pool.get_or_init(|| {
            tracing::debug!(
                max_connections = self.settings.max_connections(),
                recycle_after_secs = self.settings.recycle_after.as_secs(),
                "building database pool"
            );
            pool_options(&self.settings).connect_lazy_with(self.connect.clone())
        })
    }

    /// Whether the pool has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.pool.get().is_some()
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Close all connections if the pool was ever built.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}

fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections())
        .idle_timeout(Some(settings.recycle_after))
        .max_lifetime(Some(settings.recycle_after))
        .test_before_acquire(settings.ping_before_use)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig::from_url(Some("postgres://localhost:5432/soma")).unwrap()
    }

    #[test]
    fn not_built_until_first_use() {
        let pool = LazyPool::new(config());
        assert!(!pool.is_initialized());
        assert_eq!(pool.settings().max_connections(), 15);
    }

    #[tokio::test]
    async fn built_once_without_connecting() {
        let pool = LazyPool::new(config());

        let first = pool.get() as *const PgPool;
        let second = pool.get() as *const PgPool;

        assert!(pool.is_initialized());
        assert_eq!(first, second);
        // Lazy pools open nothing until a query runs.
        assert_eq!(pool.get().size(), 0);
        pool.close().await;
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p soma-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let pool = LazyPool::new(DatabaseConfig::from_env().expect("DATABASE_URL required"));

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(pool.get())
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let pool = std::sync::Arc::new(LazyPool::new(
            DatabaseConfig::from_env().expect("DATABASE_URL required"),
        ));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let result: (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(pool.get())
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
        assert!(pool.get().size() <= 15);
    }
}
