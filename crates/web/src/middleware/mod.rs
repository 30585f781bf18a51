//! HTTP middleware for the blog.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (records the ID into that span)
//! 4. Session layer (tower-sessions with SQLite store)
//!
//! The auth extractors read the session placed in request extensions by (4).

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use request_id::{RequestId, request_id_middleware};
pub use session::create_session_layer;
