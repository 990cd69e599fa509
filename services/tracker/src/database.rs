//! Database handle for the tracker service
//!
//! Wraps the pool created by `common::database` and applies the embedded
//! schema migrations before the handle is handed out.

use common::database::{self, DatabaseConfig};
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

/// Migrated tracker database
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect using `config` and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        let pool = database::init_pool(config).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Private in-memory database, used by tests
    pub async fn open_in_memory() -> DatabaseResult<Self> {
        let pool = database::init_pool_in_memory().await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> DatabaseResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        info!("Tracker database migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start the transaction a read-only service operation runs in
    pub async fn begin(&self) -> DatabaseResult<Transaction<'static, Sqlite>> {
        self.pool.begin().await.map_err(DatabaseError::Query)
    }

    /// Start a transaction holding the write lock from its first statement
    ///
    /// A deferred transaction that reads before it writes cannot wait for
    /// the lock on upgrade and fails with `SQLITE_BUSY` under contention.
    /// Taking the lock up front makes concurrent writers queue on the busy
    /// timeout instead.
    pub async fn begin_write(&self) -> DatabaseResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(DatabaseError::Query)
    }

    pub async fn health_check(&self) -> DatabaseResult<bool> {
        database::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_create_tracker_tables() {
        let db = Database::open_in_memory().await.expect("open database");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name != 'sqlite_sequence' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .expect("list tables");

        assert_eq!(tables, vec!["bugs", "user_assigned_bugs", "users"]);
        assert!(db.health_check().await.expect("health check"));
    }
}
