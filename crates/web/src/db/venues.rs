//! Venue repository for database operations.

use std::time::Duration;

use sqlx::PgPool;

use venue_verge_core::rules::VenueDraft;
use venue_verge_core::{UserId, VenueId};

use super::{RepositoryError, bounded, classify};
use crate::models::venue::{Venue, VenueSummary};

/// Repository for venue database operations.
pub struct VenueRepository<'a> {
    pool: &'a PgPool,
    write_timeout: Duration,
}

impl<'a> VenueRepository<'a> {
    /// Create a new venue repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, write_timeout: Duration) -> Self {
        Self {
            pool,
            write_timeout,
        }
    }

    /// Insert a venue owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner no longer exists.
    /// Returns `RepositoryError::Timeout` if the insert exceeds the write bound.
    pub async fn create(&self, owner: UserId, venue: &VenueDraft) -> Result<VenueId, RepositoryError> {
        bounded(self.write_timeout, async {
            sqlx::query_scalar::<_, VenueId>(
                r"
                INSERT INTO venue
                    (owner, name, description, location, email, price_per_hour, max_capacity, image_link)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                ",
            )
            .bind(owner)
            .bind(&venue.name)
            .bind(&venue.description)
            .bind(&venue.location)
            .bind(venue.email.as_str())
            .bind(venue.price_per_hour)
            .bind(venue.max_capacity)
            .bind(&venue.image_link)
            .fetch_one(self.pool)
            .await
            .map_err(classify)
        })
        .await
    }

    /// Get a venue by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: VenueId) -> Result<Option<Venue>, RepositoryError> {
        let venue = sqlx::query_as::<_, Venue>(
            r"
            SELECT id, owner, name, description, location, email,
                   price_per_hour, max_capacity, image_link, created_at
            FROM venue
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(venue)
    }

    /// All venues, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<VenueSummary>, RepositoryError> {
        let venues = sqlx::query_as::<_, VenueSummary>(
            r"
            SELECT id, name, description, location, image_link
            FROM venue
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(venues)
    }

    /// Overwrite the editable fields of a venue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no venue has `id`.
    /// Returns `RepositoryError::Timeout` if the update exceeds the write bound.
    pub async fn update(&self, id: VenueId, venue: &VenueDraft) -> Result<(), RepositoryError> {
        bounded(self.write_timeout, async {
            let result = sqlx::query(
                r"
                UPDATE venue
                SET name = $2, description = $3, location = $4, email = $5,
                    price_per_hour = $6, max_capacity = $7, image_link = $8
                WHERE id = $1
                ",
            )
            .bind(id)
            .bind(&venue.name)
            .bind(&venue.description)
            .bind(&venue.location)
            .bind(venue.email.as_str())
            .bind(venue.price_per_hour)
            .bind(venue.max_capacity)
            .bind(&venue.image_link)
            .execute(self.pool)
            .await
            .map_err(classify)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    /// Delete a venue. Its reservations and reviews go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no venue has `id`.
    /// Returns `RepositoryError::Timeout` if the delete exceeds the write bound.
    pub async fn delete(&self, id: VenueId) -> Result<(), RepositoryError> {
        bounded(self.write_timeout, async {
            let result = sqlx::query("DELETE FROM venue WHERE id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }
}
