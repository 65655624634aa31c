//! Reservation service error types.

use thiserror::Error;

use venue_verge_core::{AccessDenied, FieldErrors};

use crate::db::RepositoryError;

/// Errors that can occur during reservation operations.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The principal may not perform this operation.
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    /// The form failed validation or asked for a forbidden status change.
    #[error("invalid reservation: {0}")]
    Validation(FieldErrors),

    /// The reservation, or the venue being booked, does not exist.
    #[error("reservation not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ReservationError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}
