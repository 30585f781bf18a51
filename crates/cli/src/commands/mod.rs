//! CLI subcommand implementations.

pub mod migrate;
pub mod user;

use quill_web::config::{ConfigError, QuillConfig};
use quill_web::db;
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors shared by every command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] db::MigrationError),

    #[error(transparent)]
    Auth(#[from] quill_web::services::AuthError),
}

/// Connect to the configured database.
async fn connect() -> Result<SqlitePool, CommandError> {
    let config = QuillConfig::from_env()?;
    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url).await?)
}
