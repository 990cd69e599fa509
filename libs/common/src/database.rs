//! Database module for handling SQLite connections and operations
//!
//! This module provides connection pooling, configuration, and health checks
//! for the SQLite database backing the bug tracker.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// How long a connection waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: SQLite connection URL (default: "sqlite://bugtracker.db")
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    pub fn from_env() -> DatabaseResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://bugtracker.db".to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        if max_connections == 0 {
            return Err(DatabaseError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

/// Initialize a SQLite connection pool
///
/// The database file is created when missing. Foreign keys are enforced and
/// the journal runs in WAL mode.
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<SqlitePool>` - SQLite connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    info!(url = %config.database_url, "Database connection pool initialized");
    Ok(pool)
}

/// Initialize a private in-memory SQLite pool
///
/// Every connection to `sqlite::memory:` sees its own database, so the pool
/// holds exactly one connection and never recycles it.
pub async fn init_pool_in_memory() -> DatabaseResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    Ok(pool)
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - SQLite connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if connection is successful
pub async fn health_check(pool: &SqlitePool) -> DatabaseResult<bool> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DatabaseError::Query)?;

    Ok(true)
}
