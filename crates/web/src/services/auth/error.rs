//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] quill_core::EmailError),

    /// No account is registered under this email.
    #[error("email is not registered")]
    EmailNotRegistered,

    /// The account exists but the password does not match.
    #[error("incorrect password")]
    IncorrectPassword,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// A required field is missing or out of bounds.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
