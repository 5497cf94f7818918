//! Custom error types for the common library
//!
//! This module defines the database error type shared by every service,
//! including the classification of unique-constraint violations.

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

    /// A write violated a unique constraint
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint, e.g. `users_email_key`
        constraint: String,
    },

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Column named by a unique violation on `table`.
    ///
    /// Constraint names follow the Postgres default `<table>_<column>_key`.
    pub fn unique_field(&self, table: &str) -> Option<&str> {
        match self {
            DatabaseError::UniqueViolation { constraint } => constraint
                .strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(|rest| rest.strip_suffix("_key"))
                .filter(|field| !field.is_empty()),
            _ => None,
        }
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err
                    .constraint()
                    .map(str::to_string)
                    .or_else(|| constraint_from_message(db_err.message()))
                    .unwrap_or_default();
                return DatabaseError::UniqueViolation { constraint };
            }
        }

        match err {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                DatabaseError::Connection(err)
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// Pull the constraint name out of a driver message such as
/// `duplicate key value violates unique constraint "users_email_key"`.
fn constraint_from_message(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("unique constraint \"")?;
    let (name, _) = rest.split_once('"')?;
    Some(name.to_string())
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
