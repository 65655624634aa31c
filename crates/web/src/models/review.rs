//! Review domain types.

use chrono::{DateTime, Utc};

use venue_verge_core::{ReviewId, UserId, VenueId};

/// A review with its author's name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    #[sqlx(rename = "customer")]
    pub customer_id: UserId,
    #[sqlx(rename = "venue")]
    pub venue_id: VenueId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub reviewer_name: String,
}
