//! Database operations for the Quill SQLite store.
//!
//! ## Tables
//!
//! - `users` - Accounts (email is unique)
//! - `posts` - Blog posts, each owned by one user
//! - `comments` - Comments, each owned by one user and one post
//! - `tower_sessions` - Session storage (owned by `tower-sessions-sqlx-store`)
//!
//! # Migrations
//!
//! Migrations live in `crates/web/migrations/` and are embedded into the
//! binary. They run on every startup (tables are created when absent) and can
//! also be applied ahead of time with:
//! ```bash
//! cargo run -p quill-cli -- migrate
//! ```

pub mod comments;
pub mod posts;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;
use tower_sessions_sqlx_store::SqliteStore;

pub use comments::CommentRepository;
pub use posts::PostRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Errors that can occur while bringing the schema up to date.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("session store migration error: {0}")]
    SessionStore(#[from] sqlx::Error),
}

/// Create a SQLite connection pool.
///
/// The database file is created if it does not exist. Foreign keys are
/// enforced on every connection.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a pool over a private in-memory database.
///
/// Every SQLite `:memory:` connection is its own database, so the pool holds
/// exactly one connection and never recycles it.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply the embedded schema migrations and create the session table.
///
/// Safe to call on every startup: already-applied migrations are skipped.
///
/// # Errors
///
/// Returns `MigrationError` if a migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrationError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    SqliteStore::new(pool.clone()).migrate().await?;
    Ok(())
}

/// Map a sqlx error from an INSERT/UPDATE to a repository error.
///
/// Unique violations become `Conflict`; foreign key violations mean a
/// referenced row is gone and become `NotFound`.
fn map_write_error(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(e)
}
