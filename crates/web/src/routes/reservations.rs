//! Reservation route handlers.
//!
//! All routes require the customer role. The lifecycle rules live in
//! [`ReservationService`](crate::services::reservations::ReservationService);
//! handlers only translate forms and pick the page to show.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use venue_verge_core::rules::{ReservationInput, ReviewInput};
use venue_verge_core::{FieldErrors, ReservationId, ReservationStatus, VenueId};

use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, RequireCustomer, set_flash};
use crate::models::reservation::Reservation;
use crate::routes::venues::render_with_errors;
use crate::services::reservations::ReservationError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Reservation edit form: the window plus the optional status field.
///
/// A `venue_id` field, if submitted, is ignored; a reservation never moves.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateForm {
    pub start_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: Option<String>,
}

impl UpdateForm {
    fn window(&self) -> ReservationInput {
        ReservationInput {
            start_date: self.start_date.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Confirmed or cancelled reservation list.
#[derive(Template, WebTemplate)]
#[template(path = "reservations/list.html")]
pub struct ListTemplate {
    pub ctx: PageContext,
    pub status: ReservationStatus,
    pub reservations: Vec<Reservation>,
}

/// Reservation edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "reservations/edit.html")]
pub struct EditTemplate {
    pub ctx: PageContext,
    pub reservation: Reservation,
    pub form: ReservationInput,
    pub errors: FieldErrors,
}

// =============================================================================
// Routes
// =============================================================================

/// Book venue `{id}` for the logged-in customer.
///
/// Validation failures re-render the venue page with the submitted window.
pub async fn create(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(venue): Path<VenueId>,
    session: Session,
    Form(form): Form<ReservationInput>,
) -> Result<Response> {
    let result = state
        .reservations()
        .create(&customer.principal(), venue, &form, Utc::now())
        .await;

    match result {
        Ok(_) => {
            set_flash(&session, "Reservation Made!").await?;
            Ok(Redirect::to("/reservations").into_response())
        }
        Err(ReservationError::Validation(errors)) => {
            render_with_errors(
                &state,
                &session,
                venue,
                form,
                ReviewInput::default(),
                errors,
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

async fn list_with_status(
    state: &AppState,
    customer: &RequireCustomer,
    ctx: PageContext,
    status: ReservationStatus,
) -> Result<ListTemplate> {
    let reservations = state
        .reservations()
        .list(&customer.0.principal(), status)
        .await?;
    Ok(ListTemplate {
        ctx,
        status,
        reservations,
    })
}

/// The customer's confirmed reservations, newest first.
pub async fn confirmed(
    State(state): State<AppState>,
    customer: RequireCustomer,
    ctx: PageContext,
) -> Result<impl IntoResponse> {
    list_with_status(&state, &customer, ctx, ReservationStatus::Confirmed).await
}

/// The customer's cancelled reservations, newest first.
pub async fn cancelled(
    State(state): State<AppState>,
    customer: RequireCustomer,
    ctx: PageContext,
) -> Result<impl IntoResponse> {
    list_with_status(&state, &customer, ctx, ReservationStatus::Cancelled).await
}

/// Display the edit form prefilled with the stored window.
pub async fn edit_form(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<ReservationId>,
    ctx: PageContext,
) -> Result<impl IntoResponse> {
    let reservation = state
        .reservations()
        .get(&customer.principal(), id)
        .await?;
    let form = ReservationInput::from_slot(&reservation.slot());

    Ok(EditTemplate {
        ctx,
        reservation,
        form,
        errors: FieldErrors::new(),
    })
}

/// Handle edit form submission.
pub async fn update(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<ReservationId>,
    session: Session,
    Form(form): Form<UpdateForm>,
) -> Result<Response> {
    let principal = customer.principal();
    let window = form.window();
    let result = state
        .reservations()
        .update(&principal, id, &window, form.status.as_deref(), Utc::now())
        .await;

    match result {
        Ok(()) => {
            set_flash(&session, "Reservation Updated!").await?;
            Ok(Redirect::to("/reservations").into_response())
        }
        Err(ReservationError::Validation(errors)) => {
            let reservation = state.reservations().get(&principal, id).await?;
            let template = EditTemplate {
                ctx: PageContext::load(&session).await,
                reservation,
                form: window,
                errors,
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Cancel a reservation. Cancelling twice is harmless.
pub async fn cancel(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<ReservationId>,
    session: Session,
) -> Result<Redirect> {
    state
        .reservations()
        .cancel(&customer.principal(), id)
        .await?;

    set_flash(&session, "Cancelled Reservation!").await?;
    Ok(Redirect::to("/reservations/cancelled"))
}
