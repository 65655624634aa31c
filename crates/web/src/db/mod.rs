//! Database operations for Venue Verge `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - Accounts with role and password hash
//! - `venue` - Venues listed by owners
//! - `reservation` - Bookings made by customers
//! - `review` - Append-only venue reviews
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p venue-verge-cli -- migrate
//! ```
//!
//! Every write is wrapped in [`bounded`] so a stuck statement surfaces as
//! [`RepositoryError::Timeout`] instead of holding the request open.

pub mod reservations;
pub mod reviews;
pub mod users;
pub mod venues;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use venue_verge_core::rules::ReservationSlot;
use venue_verge_core::{Email, ReservationId, ReservationStatus, UserId};

pub use reservations::ReservationRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;
pub use venues::VenueRepository;

use crate::models::reservation::{NewReservation, Reservation};
use crate::models::user::{NewUser, StoredCredentials};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A value was rejected by a check constraint, named by the payload.
    #[error("check violation: {0}")]
    Invalid(String),

    /// The reservation was cancelled before the update landed.
    #[error("reservation already cancelled")]
    AlreadyCancelled,

    /// A write did not finish within the configured bound.
    #[error("write timed out after {0:?}")]
    Timeout(Duration),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run a write, giving up after `limit`.
///
/// # Errors
///
/// Returns [`RepositoryError::Timeout`] when `limit` elapses first, otherwise
/// whatever the write returned.
pub async fn bounded<T, F>(limit: Duration, write: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(limit, write)
        .await
        .map_err(|_| RepositoryError::Timeout(limit))?
}

/// Map constraint violations to repository errors.
///
/// Unique violations become `Conflict` (tagged with the constraint name),
/// check violations become `Invalid`, and foreign-key violations become
/// `NotFound`, since they mean a referenced row disappeared.
fn classify(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if let Some(classified) =
            classify_violation(db_err.kind(), db_err.constraint().unwrap_or_default())
        {
            return classified;
        }
    }
    RepositoryError::Database(e)
}

fn classify_violation(kind: ErrorKind, constraint: &str) -> Option<RepositoryError> {
    match kind {
        ErrorKind::UniqueViolation => Some(RepositoryError::Conflict(or_else(constraint, "unique"))),
        ErrorKind::CheckViolation => Some(RepositoryError::Invalid(or_else(constraint, "check"))),
        ErrorKind::ForeignKeyViolation => Some(RepositoryError::NotFound),
        _ => None,
    }
}

fn or_else(constraint: &str, fallback: &str) -> String {
    if constraint.is_empty() { fallback } else { constraint }.to_owned()
}

/// User storage as seen by the authentication service.
pub trait UserStore: Send + Sync {
    /// Insert a user, returning its ID.
    ///
    /// Fails with `Conflict` when the email is taken.
    fn insert(&self, user: &NewUser) -> impl Future<Output = Result<UserId, RepositoryError>> + Send;

    /// Look up an activated user by email.
    fn find_credentials(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<StoredCredentials>, RepositoryError>> + Send;
}

/// Reservation storage as seen by the reservation service.
pub trait ReservationStore: Send + Sync {
    /// Insert a `Confirmed` reservation, returning its ID.
    ///
    /// Fails with `NotFound` when the venue or customer does not exist.
    fn insert(
        &self,
        reservation: &NewReservation,
    ) -> impl Future<Output = Result<ReservationId, RepositoryError>> + Send;

    fn fetch_by_id(
        &self,
        id: ReservationId,
    ) -> impl Future<Output = Result<Option<Reservation>, RepositoryError>> + Send;

    /// Overwrite the window and status of a reservation.
    ///
    /// The write only lands if it would not move a cancelled row back to
    /// `Confirmed`, checked against the stored status at write time.
    ///
    /// Fails with `NotFound` when no row has `id` and with `AlreadyCancelled`
    /// when the stored row is cancelled and `status` is `Confirmed`.
    fn update(
        &self,
        id: ReservationId,
        slot: &ReservationSlot,
        status: ReservationStatus,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Set the status of a reservation.
    ///
    /// Fails with `NotFound` when no row has `id`.
    fn set_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// A customer's reservations in one status, newest first.
    fn list_for_customer(
        &self,
        customer: UserId,
        status: ReservationStatus,
    ) -> impl Future<Output = Result<Vec<Reservation>, RepositoryError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_result() {
        let ok = bounded(Duration::from_secs(1), async { Ok::<_, RepositoryError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = bounded(Duration::from_secs(1), async {
            Err::<(), _>(RepositoryError::NotFound)
        })
        .await;
        assert!(matches!(err, Err(RepositoryError::NotFound)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, RepositoryError>(())
        };
        let result = bounded(Duration::from_secs(3), slow).await;
        assert!(matches!(result, Err(RepositoryError::Timeout(d)) if d == Duration::from_secs(3)));
    }

    #[test]
    fn test_classify_leaves_other_errors_alone() {
        assert!(matches!(
            classify(sqlx::Error::RowNotFound),
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
    }

    #[test]
    fn test_check_violation_is_invalid() {
        let err = classify_violation(ErrorKind::CheckViolation, "venue_price_per_hour_check");
        assert!(matches!(err, Some(RepositoryError::Invalid(c)) if c == "venue_price_per_hour_check"));

        let err = classify_violation(ErrorKind::CheckViolation, "");
        assert!(matches!(err, Some(RepositoryError::Invalid(c)) if c == "check"));
    }

    #[test]
    fn test_unique_and_foreign_key_violations() {
        let err = classify_violation(ErrorKind::UniqueViolation, "users_email_key");
        assert!(matches!(err, Some(RepositoryError::Conflict(c)) if c == "users_email_key"));
        assert!(matches!(
            classify_violation(ErrorKind::ForeignKeyViolation, "reservation_venue_fkey"),
            Some(RepositoryError::NotFound)
        ));
        assert!(classify_violation(ErrorKind::Other, "").is_none());
    }
}
