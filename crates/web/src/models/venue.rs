//! Venue domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use venue_verge_core::rules::VenueInput;
use venue_verge_core::{UserId, VenueId};

/// A venue as shown on its detail page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Venue {
    pub id: VenueId,
    #[sqlx(rename = "owner")]
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub email: String,
    pub price_per_hour: Decimal,
    pub max_capacity: i32,
    pub image_link: String,
    pub created_at: DateTime<Utc>,
}

impl Venue {
    /// Pre-fill the edit form.
    #[must_use]
    pub fn to_input(&self) -> VenueInput {
        VenueInput {
            venue_name: self.name.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            email: self.email.clone(),
            price_per_hour: self.price_per_hour.to_string(),
            max_capacity: self.max_capacity.to_string(),
            image_link: self.image_link.clone(),
        }
    }
}

/// A row of the public venue listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueSummary {
    pub id: VenueId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub image_link: String,
}
