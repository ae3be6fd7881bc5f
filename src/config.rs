//! Application configuration management.
//!
//! Provides typed configuration loaded from environment variables with validation.

use std::str::FromStr;
use std::time::Duration;

use crate::lifecycle::TransitionPolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server to
    pub bind_address: String,

    /// Server port to bind to
    pub port: u16,

    /// Which store backs the API
    pub store: StoreConfig,

    /// Database connection pool settings
    pub pool: PoolConfig,

    /// Which status changes the store accepts
    pub transition_policy: TransitionPolicy,

    /// Observability settings
    pub observability: ObservabilityConfig,
}

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "unknown store backend '{}', expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// PostgreSQL connection URL, required for the postgres backend
    pub database_url: Option<String>,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,

    /// Minimum number of idle connections to maintain
    pub min_idle: u32,

    /// Connection acquisition timeout
    pub connection_timeout: Duration,

    /// Number of retries when acquiring a connection
    pub acquire_retries: u32,

    /// Delay between retry attempts
    pub retry_delay: Duration,
}

/// Observability configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Threshold in milliseconds for slow store operation warnings
    pub slow_query_threshold_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Postgres,
            database_url: None,
            run_migrations: true,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_idle: 1,
            connection_timeout: Duration::from_secs(30),
            acquire_retries: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            slow_query_threshold_ms: 100, // 100ms default threshold
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            store: StoreConfig::default(),
            pool: PoolConfig::default(),
            transition_policy: TransitionPolicy::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Configuration loading error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration error for '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
    /// - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
    /// - `RUN_MIGRATIONS`: Apply embedded migrations at startup (default: 1)
    /// - `BIND_ADDRESS`: Interface to listen on (default: 0.0.0.0)
    /// - `PORT`: Server port (default: 3000)
    /// - `POOL_MAX_SIZE`: Max pool connections (default: 10)
    /// - `POOL_MIN_IDLE`: Min idle connections (default: 1)
    /// - `POOL_TIMEOUT_SECS`: Connection acquire timeout (default: 30)
    /// - `POOL_ACQUIRE_RETRIES`: Connection acquire retries (default: 3)
    /// - `POOL_RETRY_DELAY_MS`: Delay between acquire retries (default: 100)
    /// - `STATUS_TRANSITIONS`: `free` or `lifecycle` (default: free)
    /// - `SLOW_QUERY_THRESHOLD_MS`: Threshold for slow store warnings in ms (default: 100)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = parse_or(&lookup, "STORE_BACKEND", StoreBackend::Postgres)?;

        let store = StoreConfig {
            backend,
            database_url: lookup("DATABASE_URL"),
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", 1u8)? != 0,
        };

        let pool = PoolConfig {
            max_size: parse_or(&lookup, "POOL_MAX_SIZE", 10)?,
            min_idle: parse_or(&lookup, "POOL_MIN_IDLE", 1)?,
            connection_timeout: Duration::from_secs(parse_or(&lookup, "POOL_TIMEOUT_SECS", 30)?),
            acquire_retries: parse_or(&lookup, "POOL_ACQUIRE_RETRIES", 3)?,
            retry_delay: Duration::from_millis(parse_or(&lookup, "POOL_RETRY_DELAY_MS", 100)?),
        };

        let config = Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            store,
            pool,
            transition_policy: parse_or(&lookup, "STATUS_TRANSITIONS", TransitionPolicy::Free)?,
            observability: ObservabilityConfig {
                slow_query_threshold_ms: parse_or(&lookup, "SLOW_QUERY_THRESHOLD_MS", 100)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == StoreBackend::Postgres {
            match self.store.database_url.as_deref() {
                None => {
                    return Err(ConfigError {
                        field: "DATABASE_URL".to_string(),
                        message: "Required environment variable not set".to_string(),
                    });
                }
                Some(url) if url.is_empty() => {
                    return Err(ConfigError {
                        field: "DATABASE_URL".to_string(),
                        message: "Cannot be empty".to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        if self.pool.max_size == 0 {
            return Err(ConfigError {
                field: "POOL_MAX_SIZE".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.pool.min_idle > self.pool.max_size {
            return Err(ConfigError {
                field: "POOL_MIN_IDLE".to_string(),
                message: "Cannot be greater than POOL_MAX_SIZE".to_string(),
            });
        }

        Ok(())
    }
}

/// Parse a variable or return a default value.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match lookup(name) {
        Some(val) => val.parse().map_err(|_| ConfigError {
            field: name.to_string(),
            message: format!("Invalid value '{}'", val),
        }),
        None => Ok(default),
    }
}
