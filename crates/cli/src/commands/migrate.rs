//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! quill-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `QUILL_DATABASE_URL` - SQLite connection string (falls back to `DATABASE_URL`)
//!
//! The web server applies the same migrations on startup; this command lets
//! a deploy bring the schema up to date before the server starts.

use quill_web::db;

use super::{CommandError, connect};

/// Apply all pending migrations, including the session table.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
