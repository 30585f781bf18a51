//! Authentication route handlers.
//!
//! Handles registration, login and logout. Failed submissions re-render the
//! form with the entered email (never the password) and a message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{FormErrors, LoginForm, RegisterForm};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub email: String,
    pub name: String,
    pub errors: FormErrors,
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub email: String,
    pub errors: FormErrors,
    pub error: Option<String>,
}

impl RegisterTemplate {
    fn with_form(current_user: Option<CurrentUser>, form: &RegisterForm) -> Self {
        Self {
            current_user,
            email: form.email.clone(),
            name: form.name.clone(),
            errors: FormErrors::default(),
            error: None,
        }
    }
}

impl LoginTemplate {
    fn with_form(current_user: Option<CurrentUser>, form: &LoginForm) -> Self {
        Self {
            current_user,
            email: form.email.clone(),
            errors: FormErrors::default(),
            error: None,
        }
    }
}

/// Turn a user-facing auth failure into a re-rendered form; propagate the rest.
fn form_failure(err: AppError, render: impl FnOnce(String) -> Response) -> Result<Response> {
    let status = err.status();
    if status.is_client_error() {
        tracing::info!(error = %err, "Auth form rejected");
        let mut response = render(err.user_message());
        *response.status_mut() = status;
        Ok(response)
    } else {
        Err(err)
    }
}

/// Store the user in a fresh session and tag Sentry with them.
async fn establish_session(session: &Session, user: &User) -> Result<()> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    RegisterTemplate::with_form(current_user, &RegisterForm::default())
}

/// Handle registration form submission.
///
/// On success the new account is logged in immediately.
///
/// # Errors
///
/// Returns 500 if the account or session cannot be stored.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        let template = RegisterTemplate {
            errors,
            ..RegisterTemplate::with_form(current_user, &form)
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
    }

    let user = match AuthService::new(state.pool())
        .register(&form.email, &form.password, &form.name)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            return form_failure(e.into(), |message| {
                RegisterTemplate {
                    error: Some(message),
                    ..RegisterTemplate::with_form(current_user, &form)
                }
                .into_response()
            });
        }
    };

    establish_session(&session, &user).await?;
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    LoginTemplate::with_form(current_user, &LoginForm::default())
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns 500 if the lookup or session write fails.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        let template = LoginTemplate {
            errors,
            ..LoginTemplate::with_form(current_user, &form)
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
    }

    let user = match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            return form_failure(e.into(), |message| {
                LoginTemplate {
                    error: Some(message),
                    ..LoginTemplate::with_form(current_user, &form)
                }
                .into_response()
            });
        }
    };

    establish_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and return to the listing. Safe to call when already logged out.
///
/// # Errors
///
/// Returns 500 if the session store cannot be updated.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
