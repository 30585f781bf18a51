//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! quill-cli user create -e alice@example.com -n "Alice" -p pw123
//! ```
//!
//! Accounts created here go through the same validation and password hashing
//! as the registration form.

use quill_core::UserId;
use quill_web::db;
use quill_web::services::AuthService;

use super::{CommandError, connect};

/// Create a new user account.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the input is invalid or the email is taken.
pub async fn create(email: &str, name: &str, password: &str) -> Result<UserId, CommandError> {
    let pool = connect().await?;
    db::run_migrations(&pool).await?;

    tracing::info!("Creating user: {}", email);
    let user = AuthService::new(&pool)
        .register(email, password, name)
        .await?;

    tracing::info!("User created successfully with ID: {}", user.id);
    Ok(user.id)
}
