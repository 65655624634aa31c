//! Account route handlers: signup, login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use venue_verge_core::FieldErrors;
use venue_verge_core::rules::{SignupEcho, SignupInput};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{PageContext, clear_current_user, set_current_user, set_flash};
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Field key for errors that belong to the whole login form.
const FORM_ERROR: &str = "default";

const MSG_DUPLICATE_EMAIL: &str = "A user with this email already exists";
const MSG_BAD_CREDENTIALS: &str = "Email or Password is incorrect";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub ctx: PageContext,
    pub form: SignupEcho,
    pub errors: FieldErrors,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub email: String,
    pub errors: FieldErrors,
}

// =============================================================================
// Signup
// =============================================================================

/// Display the signup page.
pub async fn signup_page(ctx: PageContext) -> impl IntoResponse {
    SignupTemplate {
        ctx,
        form: SignupEcho::default(),
        errors: FieldErrors::new(),
    }
}

/// Field errors for a signup the user can fix; anything else propagates.
fn signup_errors(err: AuthError) -> Result<FieldErrors> {
    match err {
        AuthError::Validation(errors) => Ok(errors),
        AuthError::DuplicateEmail => Ok(FieldErrors::single("email", MSG_DUPLICATE_EMAIL)),
        other => Err(other.into()),
    }
}

/// Handle signup form submission.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<SignupInput>,
) -> Result<Response> {
    let errors = match state.auth().signup(&input).await {
        Ok(_) => {
            set_flash(&session, "Signup was successful.").await?;
            return Ok(Redirect::to("/user/login").into_response());
        }
        Err(e) => signup_errors(e)?,
    };

    let template = SignupTemplate {
        ctx: PageContext::load(&session).await,
        form: input.echo(),
        errors,
    };
    Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(ctx: PageContext) -> impl IntoResponse {
    LoginTemplate {
        ctx,
        email: String::new(),
        errors: FieldErrors::new(),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.auth().authenticate(&form.email, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, &user.name);
            tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login failed: invalid credentials");
            let template = LoginTemplate {
                ctx: PageContext::load(&session).await,
                email: form.email,
                errors: FieldErrors::single(FORM_ERROR, MSG_BAD_CREDENTIALS),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    set_flash(&session, "You have logged out successfully!").await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_duplicate_email_is_shown_on_the_email_field() {
        let errors = signup_errors(AuthError::DuplicateEmail).unwrap();
        assert_eq!(errors.get("email"), Some(MSG_DUPLICATE_EMAIL));
        assert_eq!(errors.len(), 1);

        let html = SignupTemplate {
            ctx: PageContext::default(),
            form: SignupEcho::default(),
            errors,
        }
        .render()
        .unwrap();
        assert!(html.contains("A user with this email already exists"));
    }

    #[test]
    fn test_signup_field_errors_pass_through() {
        let errors =
            signup_errors(AuthError::Validation(FieldErrors::single("name", "must be provided")))
                .unwrap();
        assert_eq!(errors.get("name"), Some("must be provided"));
    }

    #[test]
    fn test_signup_server_errors_propagate() {
        let err = signup_errors(AuthError::PasswordHash).unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::PasswordHash)));
    }

    #[test]
    fn test_login_form_debug_redacts_password() {
        let form = LoginForm {
            email: "a@b.com".to_string(),
            password: "hunter2hunter2".to_string(),
        };
        let debug = format!("{form:?}");
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("hunter2"));
    }
}
