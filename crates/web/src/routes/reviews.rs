//! Review route handler.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use venue_verge_core::VenueId;
use venue_verge_core::rules::{ReservationInput, ReviewInput, validate_review};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::{RequireCustomer, set_flash};
use crate::routes::venues::render_with_errors;
use crate::state::AppState;

/// Add a review to a venue. Reviews are append-only.
pub async fn create(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(venue): Path<VenueId>,
    session: Session,
    Form(form): Form<ReviewInput>,
) -> Result<Response> {
    let comment = match validate_review(&form) {
        Ok(comment) => comment,
        Err(errors) => {
            return render_with_errors(
                &state,
                &session,
                venue,
                ReservationInput::default(),
                form,
                errors,
            )
            .await;
        }
    };

    let id = state
        .reviews()
        .create(customer.id, venue, &comment)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("venue {venue}")),
            other => other.into(),
        })?;
    tracing::info!(review_id = %id, venue_id = %venue, "Review added");

    set_flash(&session, "Review Added successfully!").await?;
    Ok(Redirect::to(&format!("/venue/{venue}")).into_response())
}
