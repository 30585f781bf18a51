//! Static informational pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Display the About page.
#[instrument(skip_all)]
pub async fn about(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    AboutTemplate { current_user }
}

/// Display the Contact page.
#[instrument(skip_all)]
pub async fn contact(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    ContactTemplate { current_user }
}
