//! User domain types.

use quill_core::{Email, UserId};

/// A registered account.
///
/// The password hash is deliberately not part of this type; it is only
/// loaded by [`crate::db::UserRepository::get_password_hash`] during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email (unique).
    pub email: Email,
    /// Display name shown as post and comment author.
    pub name: String,
}
