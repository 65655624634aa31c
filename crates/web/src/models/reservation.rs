//! Reservation domain types.

use chrono::{DateTime, NaiveDate, Utc};

use venue_verge_core::rules::ReservationSlot;
use venue_verge_core::{ReservationId, ReservationStatus, UserId, VenueId};

/// A reservation joined with the venue and customer names.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Reservation {
    pub id: ReservationId,
    #[sqlx(rename = "venue")]
    pub venue_id: VenueId,
    #[sqlx(rename = "customer")]
    pub customer_id: UserId,
    pub start_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub venue_name: String,
    pub customer_name: String,
}

impl Reservation {
    #[must_use]
    pub const fn slot(&self) -> ReservationSlot {
        ReservationSlot {
            start_date: self.start_date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Fields needed to insert a reservation.
#[derive(Debug, Clone, Copy)]
pub struct NewReservation {
    pub venue_id: VenueId,
    pub customer_id: UserId,
    pub slot: ReservationSlot,
}
