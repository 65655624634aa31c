//! Reservation repository for database operations.

use std::time::Duration;

use sqlx::PgPool;

use venue_verge_core::rules::ReservationSlot;
use venue_verge_core::{ReservationId, ReservationStatus, UserId};

use super::{RepositoryError, ReservationStore, bounded, classify};
use crate::models::reservation::{NewReservation, Reservation};

/// Columns shared by every reservation read, joined with venue and customer names.
const SELECT_RESERVATION: &str = r"
    SELECT r.id, r.venue, r.customer, r.start_date, r.start_time, r.end_time,
           r.status, r.created_at,
           v.name AS venue_name, u.name AS customer_name
    FROM reservation r
    JOIN venue v ON v.id = r.venue
    JOIN users u ON u.id = r.customer
";

/// Repository for reservation database operations.
pub struct ReservationRepository<'a> {
    pool: &'a PgPool,
    write_timeout: Duration,
}

impl<'a> ReservationRepository<'a> {
    /// Create a new reservation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, write_timeout: Duration) -> Self {
        Self {
            pool,
            write_timeout,
        }
    }
}

impl ReservationStore for ReservationRepository<'_> {
    async fn insert(&self, reservation: &NewReservation) -> Result<ReservationId, RepositoryError> {
        bounded(self.write_timeout, async {
            sqlx::query_scalar::<_, ReservationId>(
                r"
                INSERT INTO reservation (venue, customer, start_date, start_time, end_time, status)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                ",
            )
            .bind(reservation.venue_id)
            .bind(reservation.customer_id)
            .bind(reservation.slot.start_date)
            .bind(reservation.slot.start_time)
            .bind(reservation.slot.end_time)
            .bind(ReservationStatus::Confirmed)
            .fetch_one(self.pool)
            .await
            .map_err(classify)
        })
        .await
    }

    async fn fetch_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        let query = format!("{SELECT_RESERVATION} WHERE r.id = $1");
        let reservation = sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(reservation)
    }

    async fn update(
        &self,
        id: ReservationId,
        slot: &ReservationSlot,
        status: ReservationStatus,
    ) -> Result<(), RepositoryError> {
        bounded(self.write_timeout, async {
            // 1 = confirmed, 2 = cancelled
            let result = sqlx::query(
                r"
                UPDATE reservation
                SET start_date = $2, start_time = $3, end_time = $4, status = $5
                WHERE id = $1 AND NOT (status = 2 AND $5 = 1)
                ",
            )
            .bind(id)
            .bind(slot.start_date)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .bind(status)
            .execute(self.pool)
            .await
            .map_err(classify)?;

            if result.rows_affected() > 0 {
                return Ok(());
            }

            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM reservation WHERE id = $1)",
            )
            .bind(id)
            .fetch_one(self.pool)
            .await?;

            if exists {
                Err(RepositoryError::AlreadyCancelled)
            } else {
                Err(RepositoryError::NotFound)
            }
        })
        .await
    }

    async fn set_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<(), RepositoryError> {
        bounded(self.write_timeout, async {
            let result = sqlx::query("UPDATE reservation SET status = $2 WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    async fn list_for_customer(
        &self,
        customer: UserId,
        status: ReservationStatus,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let query = format!(
            "{SELECT_RESERVATION} WHERE r.customer = $1 AND r.status = $2 \
             ORDER BY r.created_at DESC, r.id DESC"
        );
        let reservations = sqlx::query_as::<_, Reservation>(&query)
            .bind(customer)
            .bind(status)
            .fetch_all(self.pool)
            .await?;

        Ok(reservations)
    }
}
