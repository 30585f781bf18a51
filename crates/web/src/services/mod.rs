//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `posts` - Post and comment operations, including author-only checks
//!
//! Services borrow the pool for the duration of one request and are cheap to
//! construct in each handler.

pub mod auth;
pub mod posts;

pub use auth::{AuthError, AuthService};
pub use posts::{PostError, PostService};
