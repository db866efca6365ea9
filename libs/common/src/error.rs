//! Errors raised while configuring, connecting to or migrating PostgreSQL

use sqlx::migrate::MigrateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The pool could not open its connections
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// `DATABASE_URL` is not a valid PostgreSQL URL
    #[error("Invalid database URL: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    /// Inconsistent pool settings
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
