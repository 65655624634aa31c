//! Reservation service.
//!
//! Every operation takes the acting [`Principal`] explicitly and checks the
//! customer role before touching storage. The check is by role only: any
//! customer may update or cancel a reservation they know the ID of, while the
//! listings only ever show the caller's own bookings.
//!
//! There is no overlap guard. Two bookings of the same venue for the same
//! window both succeed.

mod error;

pub use error::ReservationError;

use chrono::{DateTime, Utc};

use venue_verge_core::lifecycle::{self, LifecycleError};
use venue_verge_core::rules::{ReservationInput, validate_reservation};
use venue_verge_core::{
    FieldErrors, Principal, ReservationId, ReservationStatus, Role, VenueId, authorize,
};

use crate::db::{RepositoryError, ReservationStore};
use crate::models::reservation::{NewReservation, Reservation};

/// Reservation service.
pub struct ReservationService<S> {
    store: S,
}

impl<S: ReservationStore> ReservationService<S> {
    /// Create a new reservation service.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Book `venue` for the principal.
    ///
    /// # Errors
    ///
    /// Returns `ReservationError::Denied` unless the principal is a customer.
    /// Returns `ReservationError::Validation` if the window is invalid at `now`.
    /// Returns `ReservationError::NotFound` if the venue does not exist.
    pub async fn create(
        &self,
        principal: &Principal,
        venue: VenueId,
        input: &ReservationInput,
        now: DateTime<Utc>,
    ) -> Result<ReservationId, ReservationError> {
        let customer = authorize(Some(principal), Role::Customer)?;
        let slot = validate_reservation(input, now).map_err(ReservationError::Validation)?;

        let id = self
            .store
            .insert(&NewReservation {
                venue_id: venue,
                customer_id: customer.user_id,
                slot,
            })
            .await?;

        tracing::info!(reservation_id = %id, venue_id = %venue, "Reservation created");
        Ok(id)
    }

    /// Fetch one reservation.
    ///
    /// # Errors
    ///
    /// Returns `ReservationError::Denied` unless the principal is a customer.
    /// Returns `ReservationError::NotFound` if no reservation has `id`.
    pub async fn get(
        &self,
        principal: &Principal,
        id: ReservationId,
    ) -> Result<Reservation, ReservationError> {
        authorize(Some(principal), Role::Customer)?;
        self.store
            .fetch_by_id(id)
            .await?
            .ok_or(ReservationError::NotFound)
    }

    /// Replace the window of a reservation and optionally move its status.
    ///
    /// `requested_status` is the raw status form value; blank keeps the
    /// current status. Window and status problems are reported together.
    ///
    /// # Errors
    ///
    /// Returns `ReservationError::Denied` unless the principal is a customer.
    /// Returns `ReservationError::NotFound` if no reservation has `id`.
    /// Returns `ReservationError::Validation` for an invalid window, an unknown
    /// status, or an attempt to reinstate a cancelled reservation. The last
    /// also covers a cancel that lands between the read and the write.
    pub async fn update(
        &self,
        principal: &Principal,
        id: ReservationId,
        input: &ReservationInput,
        requested_status: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), ReservationError> {
        let current = self.get(principal, id).await?;

        let slot = validate_reservation(input, now);
        let status = lifecycle::requested_status(requested_status)
            .and_then(|requested| lifecycle::apply_update(current.status, requested))
            .map_err(LifecycleError::into_field_errors);

        let (slot, status) = match (slot, status) {
            (Ok(slot), Ok(status)) => (slot, status),
            (slot, status) => {
                let mut errors = FieldErrors::new();
                if let Err(e) = slot {
                    errors.merge(e);
                }
                if let Err(e) = status {
                    errors.merge(e);
                }
                return Err(ReservationError::Validation(errors));
            }
        };

        match self.store.update(id, &slot, status).await {
            Ok(()) => {}
            Err(RepositoryError::AlreadyCancelled) => {
                tracing::info!(reservation_id = %id, "Update lost to a concurrent cancel");
                return Err(ReservationError::Validation(
                    LifecycleError::CannotReinstate.into_field_errors(),
                ));
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!(reservation_id = %id, status = %status, "Reservation updated");
        Ok(())
    }

    /// Cancel a reservation. Cancelling an already cancelled reservation
    /// succeeds and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ReservationError::Denied` unless the principal is a customer.
    /// Returns `ReservationError::NotFound` if no reservation has `id`.
    pub async fn cancel(
        &self,
        principal: &Principal,
        id: ReservationId,
    ) -> Result<(), ReservationError> {
        let current = self.get(principal, id).await?;
        let next = lifecycle::cancel(current.status);
        if next != current.status {
            self.store.set_status(id, next).await?;
            tracing::info!(reservation_id = %id, "Reservation cancelled");
        }
        Ok(())
    }

    /// The principal's reservations in `status`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ReservationError::Denied` unless the principal is a customer.
    pub async fn list(
        &self,
        principal: &Principal,
        status: ReservationStatus,
    ) -> Result<Vec<Reservation>, ReservationError> {
        let customer = authorize(Some(principal), Role::Customer)?;
        Ok(self
            .store
            .list_for_customer(customer.user_id, status)
            .await?)
    }
}
