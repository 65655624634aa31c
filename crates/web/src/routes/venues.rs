//! Venue route handlers.
//!
//! Listing and detail pages are public. Creating, editing and deleting a venue
//! requires the owner role, and any owner may change any venue.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use venue_verge_core::rules::{ReservationInput, ReviewInput, VenueInput, validate_venue};
use venue_verge_core::{FieldErrors, VenueId};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{PageContext, RequireOwner, set_flash};
use crate::models::review::Review;
use crate::models::venue::{Venue, VenueSummary};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Venue listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "venues/listing.html")]
pub struct ListingTemplate {
    pub ctx: PageContext,
    pub venues: Vec<VenueSummary>,
}

/// Create/edit form template.
///
/// `venue_id` is `None` when creating.
#[derive(Template, WebTemplate)]
#[template(path = "venues/form.html")]
pub struct VenueFormTemplate {
    pub ctx: PageContext,
    pub venue_id: Option<VenueId>,
    pub form: VenueInput,
    pub errors: FieldErrors,
}

impl VenueFormTemplate {
    /// Where the form posts to.
    #[must_use]
    pub fn action(&self) -> String {
        self.venue_id
            .map_or_else(|| "/venue/add".to_string(), |id| format!("/venue/{id}/edit"))
    }
}

/// Venue detail page: reviews plus the reservation and review forms.
#[derive(Template, WebTemplate)]
#[template(path = "venues/show.html")]
pub struct VenueTemplate {
    pub ctx: PageContext,
    pub venue: Venue,
    pub reviews: Vec<Review>,
    pub reservation: ReservationInput,
    pub review: ReviewInput,
    pub errors: FieldErrors,
}

/// Columns guarded by a check constraint on the venue table.
const CHECKED_COLUMNS: [&str; 2] = ["price_per_hour", "max_capacity"];

/// Turn a write the database refused into form errors.
///
/// Only check violations are the user's to fix; anything else propagates.
fn rejected_fields(err: RepositoryError) -> Result<FieldErrors> {
    let RepositoryError::Invalid(constraint) = err else {
        return Err(err.into());
    };
    let field = CHECKED_COLUMNS
        .into_iter()
        .find(|column| constraint.contains(column))
        .unwrap_or("venue_name");
    Ok(FieldErrors::single(field, "is out of range"))
}

/// Re-render the create/edit form with field errors (status 422).
async fn form_with_errors(
    session: &Session,
    venue_id: Option<VenueId>,
    form: VenueInput,
    errors: FieldErrors,
) -> Response {
    let template = VenueFormTemplate {
        ctx: PageContext::load(session).await,
        venue_id,
        form,
        errors,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
}

/// Load a venue and its reviews for the detail page.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the venue does not exist.
pub async fn load_venue(state: &AppState, id: VenueId) -> Result<(Venue, Vec<Review>)> {
    let venue = state
        .venues()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("venue {id}")))?;
    let reviews = state.reviews().list_for_venue(id).await?;
    Ok((venue, reviews))
}

/// Re-render the detail page with field errors (status 422).
///
/// # Errors
///
/// Returns `AppError::NotFound` if the venue has disappeared meanwhile.
pub async fn render_with_errors(
    state: &AppState,
    session: &Session,
    id: VenueId,
    reservation: ReservationInput,
    review: ReviewInput,
    errors: FieldErrors,
) -> Result<Response> {
    let (venue, reviews) = load_venue(state, id).await?;
    let template = VenueTemplate {
        ctx: PageContext::load(session).await,
        venue,
        reviews,
        reservation,
        review,
        errors,
    };
    Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
}

// =============================================================================
// Public Routes
// =============================================================================

/// Display all venues, newest first.
pub async fn listing(State(state): State<AppState>, ctx: PageContext) -> Result<impl IntoResponse> {
    let venues = state.venues().list().await?;
    Ok(ListingTemplate { ctx, venues })
}

/// Display one venue.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<VenueId>,
    ctx: PageContext,
) -> Result<impl IntoResponse> {
    let (venue, reviews) = load_venue(&state, id).await?;
    Ok(VenueTemplate {
        ctx,
        venue,
        reviews,
        reservation: ReservationInput::default(),
        review: ReviewInput::default(),
        errors: FieldErrors::new(),
    })
}

// =============================================================================
// Owner Routes
// =============================================================================

/// Display the new-venue form.
pub async fn new_form(_owner: RequireOwner, ctx: PageContext) -> impl IntoResponse {
    VenueFormTemplate {
        ctx,
        venue_id: None,
        form: VenueInput::default(),
        errors: FieldErrors::new(),
    }
}

/// Handle new-venue form submission.
pub async fn create(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    session: Session,
    Form(form): Form<VenueInput>,
) -> Result<Response> {
    let draft = match validate_venue(&form) {
        Ok(draft) => draft,
        Err(errors) => return Ok(form_with_errors(&session, None, form, errors).await),
    };

    let id = match state.venues().create(owner.id, &draft).await {
        Ok(id) => id,
        Err(e) => {
            let errors = rejected_fields(e)?;
            return Ok(form_with_errors(&session, None, form, errors).await);
        }
    };
    tracing::info!(venue_id = %id, owner_id = %owner.id, "Venue created");

    set_flash(&session, "Venue created successfully!").await?;
    Ok(Redirect::to("/venue/listing").into_response())
}

/// Display the edit form prefilled with the stored venue.
pub async fn edit_form(
    State(state): State<AppState>,
    _owner: RequireOwner,
    Path(id): Path<VenueId>,
    ctx: PageContext,
) -> Result<impl IntoResponse> {
    let venue = state
        .venues()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("venue {id}")))?;

    Ok(VenueFormTemplate {
        ctx,
        venue_id: Some(id),
        form: venue.to_input(),
        errors: FieldErrors::new(),
    })
}

/// Handle edit form submission.
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<VenueId>,
    session: Session,
    Form(form): Form<VenueInput>,
) -> Result<Response> {
    let draft = match validate_venue(&form) {
        Ok(draft) => draft,
        Err(errors) => return Ok(form_with_errors(&session, Some(id), form, errors).await),
    };

    if let Err(e) = state.venues().update(id, &draft).await {
        let errors = rejected_fields(e)?;
        return Ok(form_with_errors(&session, Some(id), form, errors).await);
    }
    tracing::info!(venue_id = %id, owner_id = %owner.id, "Venue updated");

    set_flash(&session, "Update Made successfully!").await?;
    Ok(Redirect::to(&format!("/venue/{id}")).into_response())
}

/// Delete a venue together with its reservations and reviews.
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<VenueId>,
    session: Session,
) -> Result<Redirect> {
    state.venues().delete(id).await?;
    tracing::info!(venue_id = %id, owner_id = %owner.id, "Venue deleted");

    set_flash(&session, "Venue Removed successfully!").await?;
    Ok(Redirect::to("/venue/listing"))
}
