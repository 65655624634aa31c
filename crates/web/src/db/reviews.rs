//! Review repository for database operations.

use std::time::Duration;

use sqlx::PgPool;

use venue_verge_core::{ReviewId, UserId, VenueId};

use super::{RepositoryError, bounded, classify};
use crate::models::review::Review;

/// Repository for review database operations. Reviews are append-only.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
    write_timeout: Duration,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, write_timeout: Duration) -> Self {
        Self {
            pool,
            write_timeout,
        }
    }

    /// Insert a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the venue or customer does not exist.
    /// Returns `RepositoryError::Timeout` if the insert exceeds the write bound.
    pub async fn create(
        &self,
        customer: UserId,
        venue: VenueId,
        comment: &str,
    ) -> Result<ReviewId, RepositoryError> {
        bounded(self.write_timeout, async {
            sqlx::query_scalar::<_, ReviewId>(
                r"
                INSERT INTO review (customer, venue, comment)
                VALUES ($1, $2, $3)
                RETURNING id
                ",
            )
            .bind(customer)
            .bind(venue)
            .bind(comment)
            .fetch_one(self.pool)
            .await
            .map_err(classify)
        })
        .await
    }

    /// Reviews of a venue with reviewer names, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_venue(&self, venue: VenueId) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            r"
            SELECT r.id, r.customer, r.venue, r.comment, r.created_at,
                   u.name AS reviewer_name
            FROM review r
            JOIN users u ON u.id = r.customer
            WHERE r.venue = $1
            ORDER BY r.created_at DESC, r.id DESC
            ",
        )
        .bind(venue)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }
}
