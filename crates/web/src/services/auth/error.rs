//! Authentication error types.

use thiserror::Error;

use venue_verge_core::FieldErrors;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signup form failed validation.
    #[error("invalid signup: {0}")]
    Validation(FieldErrors),

    /// Another account already uses this email.
    #[error("user already exists")]
    DuplicateEmail,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
