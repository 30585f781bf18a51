//! Domain models for Quill.
//!
//! These are validated domain objects, separate from the sqlx row types
//! in [`crate::db`].

pub mod comment;
pub mod post;
pub mod session;
pub mod user;

pub use comment::Comment;
pub use post::{Author, Post, PostContent};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
