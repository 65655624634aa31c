//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! VV_USER_PASSWORD='correct horse battery' \
//!     vv-cli user create -e owner@example.com -n "Olive Owner" -r owner
//! ```
//!
//! The password is read from `VV_USER_PASSWORD` so it never shows up in the
//! process list or shell history.

use std::time::Duration;

use thiserror::Error;

use venue_verge_core::Role;
use venue_verge_core::rules::SignupInput;
use venue_verge_web::db::users::UserRepository;
use venue_verge_web::services::auth::{AuthError, AuthService};

use super::{DATABASE_URL_VAR, database_url};

/// Environment variable holding the new user's password.
pub const PASSWORD_VAR: &str = "VV_USER_PASSWORD";

const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: owner, customer")]
    InvalidRole(String),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Signup rules rejected the account.
    #[error("{0}")]
    Rejected(String),

    /// Signup failed for another reason.
    #[error(transparent)]
    Auth(AuthError),
}

impl From<AuthError> for UserError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => {
                let mut fields: Vec<String> = errors
                    .iter()
                    .map(|(field, message)| format!("{field}: {message}"))
                    .collect();
                fields.sort();
                Self::Rejected(fields.join("; "))
            }
            AuthError::DuplicateEmail => {
                Self::Rejected("a user with this email already exists".to_owned())
            }
            other => Self::Auth(other),
        }
    }
}

/// Create a new, activated user.
///
/// Goes through the same signup rules as the web form.
///
/// # Errors
///
/// Returns an error if the role is unknown, the password or database URL is
/// missing, or the account fails the signup rules.
pub async fn create(email: &str, name: &str, role: &str) -> Result<i32, UserError> {
    let role: Role = role
        .parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;

    let url = database_url().ok_or(UserError::MissingEnvVar(DATABASE_URL_VAR))?;
    let password =
        std::env::var(PASSWORD_VAR).map_err(|_| UserError::MissingEnvVar(PASSWORD_VAR))?;

    tracing::info!("Connecting to database...");
    let pool = venue_verge_web::db::create_pool(&url).await?;

    tracing::info!("Creating user: {} ({})", email, role);
    let input = SignupInput {
        name: name.to_owned(),
        email: email.to_owned(),
        password,
        role: role.code().to_string(),
    };
    let id = AuthService::new(UserRepository::new(&pool, WRITE_TIMEOUT))
        .signup(&input)
        .await?;

    tracing::info!("User created with ID: {}", id);
    Ok(id.as_i32())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use venue_verge_core::FieldErrors;

    use super::*;

    #[tokio::test]
    async fn test_unknown_role_is_rejected_before_connecting() {
        let err = create("a@example.com", "A", "admin").await.unwrap_err();
        assert!(matches!(err, UserError::InvalidRole(role) if role == "admin"));
    }

    #[test]
    fn test_validation_errors_are_listed() {
        let mut errors = FieldErrors::single("password", "must be at least 10 characters long");
        errors.merge(FieldErrors::single("email", "must be a valid email address"));

        let err = UserError::from(AuthError::Validation(errors));
        assert_eq!(
            err.to_string(),
            "email: must be a valid email address; password: must be at least 10 characters long"
        );
    }

    #[test]
    fn test_duplicate_email_message() {
        let err = UserError::from(AuthError::DuplicateEmail);
        assert_eq!(err.to_string(), "a user with this email already exists");
    }
}
