//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Driver message of a failed UNIQUE constraint, if that is what this error is
    ///
    /// SQLite reports these as `UNIQUE constraint failed: <table>.<column>`.
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            DatabaseError::Query(SqlxError::Database(db)) if db.is_unique_violation() => {
                Some(db.message())
            }
            _ => None,
        }
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(e: SqlxError) -> Self {
        DatabaseError::Query(e)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        let err = DatabaseError::from(SqlxError::RowNotFound);
        assert!(err.unique_violation().is_none());

        let err = DatabaseError::Migration("boom".to_string());
        assert!(err.unique_violation().is_none());
    }

    #[test]
    fn test_display_includes_source_message() {
        let err = DatabaseError::Configuration("Invalid database URL".to_string());
        assert_eq!(
            err.to_string(),
            "Database configuration error: Invalid database URL"
        );
    }
}
