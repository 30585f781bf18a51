//! Post listing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::IntoResponse,
};
use tracing::instrument;

use quill_core::UserId;

use crate::error::Result;
use crate::extract::IdPath;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Post};
use crate::services::PostService;
use crate::state::AppState;

/// Post listing template, shared by the home page and per-user pages.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub current_user: Option<CurrentUser>,
    /// Author name when listing a single user's posts.
    pub author_name: Option<String>,
    pub posts: Vec<Post>,
}

/// List every post.
///
/// # Errors
///
/// Returns 500 if the posts cannot be loaded.
#[instrument(skip(state, current_user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let posts = PostService::new(state.pool()).list_all().await?;

    Ok(IndexTemplate {
        current_user,
        author_name: None,
        posts,
    })
}

/// List the posts written by one user.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
#[instrument(skip(state, current_user))]
pub async fn user_posts(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    IdPath(user_id): IdPath<UserId>,
) -> Result<impl IntoResponse> {
    let (author, posts) = PostService::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(IndexTemplate {
        current_user,
        author_name: Some(author.name),
        posts,
    })
}
