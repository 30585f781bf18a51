//! HTTP route handlers for the blog.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - All posts
//! GET  /user/{id}          - One author's posts (POST accepted too)
//! GET  /post/{id}          - Post with comments
//! POST /post/{id}          - Add a comment (requires auth)
//!
//! # Auth
//! GET  /register           - Register page
//! POST /register           - Register action (logs in)
//! GET  /login              - Login page
//! POST /login              - Login action
//! GET  /logout             - Logout action
//!
//! # Authoring (requires auth; edit/delete author only)
//! GET  /new-post           - New post form
//! POST /new-post           - Create post
//! GET  /edit-post/{id}     - Edit form
//! POST /edit-post/{id}     - Update post
//! GET  /delete/{id}        - Delete post and its comments
//!
//! # Pages
//! GET  /about
//! GET  /contact
//!
//! # Health
//! GET  /health             - Liveness
//! GET  /health/ready       - Readiness (database)
//! ```

pub mod auth;
pub mod health;
pub mod home;
pub mod pages;
pub mod posts;

use axum::{Router, extract::Request, middleware::from_fn, routing::get};
use tower_http::trace::TraceLayer;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/user/{id}", get(home::user_posts).post(home::user_posts))
        .route("/post/{id}", get(posts::show).post(posts::comment))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/new-post", get(posts::new_post_page).post(posts::create))
        .route(
            "/edit-post/{id}",
            get(posts::edit_page).post(posts::update),
        )
        .route("/delete/{id}", get(posts::delete))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
}

/// Build the full application: routes, health checks, sessions and tracing.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
