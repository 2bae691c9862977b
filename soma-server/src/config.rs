//! Server and database configuration
//!
//! Loaded from environment variables:
//! - `DATABASE_URL`: Postgres connection string (required)
//! - `PORT`: listen port (default: 8000, bound on 0.0.0.0)
//!
//! A missing or malformed value is a startup failure; nothing here is
//! retried.

use std::net::SocketAddr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const PORT_ENV: &str = "PORT";

const DEFAULT_PORT: u16 = 8000;

/// Connections kept for steady-state load
const BASE_CONNECTIONS: u32 = 5;

/// Extra connections allowed under burst
const OVERFLOW_CONNECTIONS: u32 = 10;

/// Idle connections older than this are closed and reopened
const RECYCLE_AFTER: Duration = Duration::from_secs(60 * 60);

/// Configuration errors, all fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,

    #[error("invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(#[source] sqlx::Error),

    #[error("invalid PORT value '{value}': expected a port number")]
    InvalidPort { value: String },
}

/// Connection pool sizing and recycling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub base_connections: u32,
    pub overflow_connections: u32,
    /// Applied as both idle timeout and max lifetime
    pub recycle_after: Duration,
    /// Ping a pooled connection before handing it out
    pub ping_before_use: bool,
}

impl PoolSettings {
    /// Upper bound on live connections.
    pub fn max_connections(&self) -> u32 {
        self.base_connections + self.overflow_connections
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            base_connections: BASE_CONNECTIONS,
            overflow_connections: OVERFLOW_CONNECTIONS,
            recycle_after: RECYCLE_AFTER,
            ping_before_use: true,
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connect: PgConnectOptions,
    pub pool: PoolSettings,
}

impl DatabaseConfig {
    /// Parse a connection string. Absent or blank is an error.
    pub fn from_url(url: Option<&str>) -> Result<Self, ConfigError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let connect = url
            .parse::<PgConnectOptions>()
            .map_err(ConfigError::InvalidDatabaseUrl)?;

        Ok(Self {
            connect,
            pool: PoolSettings::default(),
        })
    }

    /// Read `DATABASE_URL` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_url(std::env::var(DATABASE_URL_ENV).ok().as_deref())
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Bind on all interfaces at `PORT` (default 8000).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_port_var(std::env::var(PORT_ENV).ok().as_deref())
    }

    fn from_port_var(port: Option<&str>) -> Result<Self, ConfigError> {
        let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => p.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                value: p.to_owned(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        }
    }
}
