//! Post detail, commenting and authoring route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use comrak::{Options, markdown_to_html};
use tracing::instrument;

use quill_core::PostId;

use crate::error::Result;
use crate::extract::IdPath;
use crate::filters;
use crate::forms::{CommentForm, FormErrors, PostForm};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Comment, CurrentUser, Post};
use crate::services::PostService;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Post detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub current_user: Option<CurrentUser>,
    pub post: Post,
    /// Rendered Markdown body. Raw HTML in the source is dropped.
    pub body_html: String,
    /// Whether the viewer wrote this post.
    pub can_edit: bool,
    pub comments: Vec<Comment>,
    pub comment_text: String,
    pub errors: FormErrors,
}

impl PostTemplate {
    fn new(current_user: Option<CurrentUser>, post: Post, comments: Vec<Comment>) -> Self {
        let can_edit = current_user
            .as_ref()
            .is_some_and(|user| post.is_authored_by(user.id));

        Self {
            body_html: render_markdown(&post.body),
            current_user,
            post,
            can_edit,
            comments,
            comment_text: String::new(),
            errors: FormErrors::default(),
        }
    }
}

/// Create/edit post form template.
#[derive(Template, WebTemplate)]
#[template(path = "make-post.html")]
pub struct MakePostTemplate {
    pub current_user: Option<CurrentUser>,
    /// "New Post" or "Edit Post".
    pub heading: &'static str,
    /// Where the form submits to.
    pub action: String,
    pub form: PostForm,
    pub errors: FormErrors,
}

fn render_markdown(body: &str) -> String {
    markdown_to_html(body, &Options::default())
}

fn post_url(id: PostId) -> String {
    format!("/post/{id}")
}

// =============================================================================
// Detail + Comments
// =============================================================================

/// Display a post with its comments.
///
/// # Errors
///
/// Returns 404 if the post does not exist.
#[instrument(skip(state, current_user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    IdPath(id): IdPath<PostId>,
) -> Result<impl IntoResponse> {
    let (post, comments) = PostService::new(state.pool()).get_with_comments(id).await?;
    Ok(PostTemplate::new(current_user, post, comments))
}

/// Add a comment, then redirect back to the post.
///
/// # Errors
///
/// Returns 404 if the post does not exist.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn comment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    IdPath(id): IdPath<PostId>,
    Form(form): Form<CommentForm>,
) -> Result<Response> {
    let service = PostService::new(state.pool());

    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            let (post, comments) = service.get_with_comments(id).await?;
            let template = PostTemplate {
                comment_text: form.text,
                errors,
                ..PostTemplate::new(Some(user), post, comments)
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    service.add_comment(id, user.id, &text).await?;
    Ok(Redirect::to(&post_url(id)).into_response())
}

// =============================================================================
// Create
// =============================================================================

/// Display the new post form.
#[instrument(skip_all)]
pub async fn new_post_page(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    MakePostTemplate {
        current_user: Some(user),
        heading: "New Post",
        action: "/new-post".to_string(),
        form: PostForm::default(),
        errors: FormErrors::default(),
    }
}

/// Publish a new post as the current user.
///
/// # Errors
///
/// Returns 500 if the post cannot be stored.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    let content = match form.validate() {
        Ok(content) => content,
        Err(errors) => {
            let template = MakePostTemplate {
                current_user: Some(user),
                heading: "New Post",
                action: "/new-post".to_string(),
                form,
                errors,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    PostService::new(state.pool())
        .create(user.id, &content)
        .await?;
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Edit + Delete (author only)
// =============================================================================

/// Display the edit form pre-filled with the post.
///
/// # Errors
///
/// Returns 404 if the post does not exist, 403 if the viewer is not its author.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    IdPath(id): IdPath<PostId>,
) -> Result<impl IntoResponse> {
    let post = PostService::new(state.pool())
        .authorize_author(id, user.id)
        .await?;

    Ok(MakePostTemplate {
        current_user: Some(user),
        heading: "Edit Post",
        action: format!("/edit-post/{id}"),
        form: PostForm::from(post.content()),
        errors: FormErrors::default(),
    })
}

/// Overwrite a post's title, subtitle, image URL and body.
///
/// # Errors
///
/// Returns 404 if the post does not exist, 403 if the viewer is not its author.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    IdPath(id): IdPath<PostId>,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    let service = PostService::new(state.pool());
    service.authorize_author(id, user.id).await?;

    let content = match form.validate() {
        Ok(content) => content,
        Err(errors) => {
            let template = MakePostTemplate {
                current_user: Some(user),
                heading: "Edit Post",
                action: format!("/edit-post/{id}"),
                form,
                errors,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    service.update(id, user.id, &content).await?;
    Ok(Redirect::to(&post_url(id)).into_response())
}

/// Delete a post and its comments.
///
/// # Errors
///
/// Returns 404 if the post does not exist, 403 if the viewer is not its author.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    IdPath(id): IdPath<PostId>,
) -> Result<Redirect> {
    PostService::new(state.pool()).delete(id, user.id).await?;
    Ok(Redirect::to("/"))
}
