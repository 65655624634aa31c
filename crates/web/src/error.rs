//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Handlers deal with the errors a user can
//! fix (field errors, bad credentials) themselves by re-rendering the form;
//! everything else is returned as `AppError` and ends up on the error page.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::filters;
use crate::middleware::{AuthRejection, PageContext};
use crate::services::auth::AuthError;
use crate::services::reservations::ReservationError;

/// Generic error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub ctx: PageContext,
    pub status: u16,
    pub message: &'static str,
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Reservation operation failed.
    #[error("Reservation error: {0}")]
    Reservation(#[from] ReservationError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// What the client sees for an error.
enum Outcome {
    Page(StatusCode),
    Redirect(AuthRejection),
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) | RepositoryError::AlreadyCancelled => StatusCode::CONFLICT,
        RepositoryError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    fn outcome(&self) -> Outcome {
        let status = match self {
            Self::Database(err) => repository_status(err),
            Self::Auth(err) => match err {
                AuthError::Validation(_)
                | AuthError::DuplicateEmail
                | AuthError::InvalidCredentials => StatusCode::UNPROCESSABLE_ENTITY,
                AuthError::Repository(err) => repository_status(err),
                AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Reservation(err) => match err {
                ReservationError::Denied(denied) => {
                    return Outcome::Redirect(AuthRejection::from(*denied));
                }
                ReservationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ReservationError::NotFound => StatusCode::NOT_FOUND,
                ReservationError::Repository(err) => repository_status(err),
            },
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };
        Outcome::Page(status)
    }
}

/// Message shown on the error page. Never carries internal details.
const fn public_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "The request could not be understood.",
        403 => "You are not allowed to view this page.",
        404 => "The page you are looking for does not exist.",
        409 => "That change conflicts with existing data.",
        422 => "Some of the submitted information is invalid.",
        503 => "The service is busy right now. Please try again in a moment.",
        _ => "Something went wrong on our side.",
    }
}

/// Render the error page, falling back to plain text if the template fails.
#[must_use]
pub fn error_page(status: StatusCode, ctx: PageContext) -> Response {
    let template = ErrorTemplate {
        ctx,
        status: status.as_u16(),
        message: public_message(status),
    };
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render error page");
            (status, public_message(status)).into_response()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.outcome() {
            Outcome::Redirect(rejection) => return rejection.into_response(),
            Outcome::Page(status) => status,
        };

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        error_page(status, PageContext::default())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after login.
pub fn set_sentry_user(user_id: &impl ToString, name: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(name.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::http::header::LOCATION;
    use venue_verge_core::{AccessDenied, FieldErrors, Role};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("venue 9".to_string());
        assert_eq!(err.to_string(), "Not found: venue 9");
    }

    #[test]
    fn test_repository_status_codes() {
        assert_eq!(
            get_status(RepositoryError::Timeout(Duration::from_secs(3)).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RepositoryError::Invalid("venue_price_per_hour_check".into()).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_reservation_status_codes() {
        assert_eq!(
            get_status(ReservationError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(
                ReservationError::Validation(FieldErrors::single("end_time", "must be provided"))
                    .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(
                ReservationError::Repository(RepositoryError::Timeout(Duration::from_secs(3)))
                    .into()
            ),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_denied_reservations_redirect() {
        let response =
            AppError::from(ReservationError::Denied(AccessDenied::Unauthenticated)).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/user/login");

        let response = AppError::from(ReservationError::Denied(AccessDenied::WrongRole {
            required: Role::Customer,
        }))
        .into_response();
        assert_eq!(response.headers()[LOCATION], "/unauthorized");
    }

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AuthError::PasswordHash.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_hide_details() {
        assert!(!public_message(StatusCode::INTERNAL_SERVER_ERROR).contains("sqlx"));
        assert_ne!(
            public_message(StatusCode::NOT_FOUND),
            public_message(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }
}
