//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - Home page
//!
//! # Accounts
//! GET  /user/signup                    - Signup page
//! POST /user/signup                    - Create account (rate limited)
//! GET  /user/login                     - Login page
//! POST /user/login                     - Authenticate (rate limited)
//! POST /user/logout                    - Logout
//!
//! # Venues
//! GET  /venue/listing                  - All venues
//! GET  /venue/{id}                     - Venue detail, reviews, reservation form
//! GET  /venue/form                     - New venue form (owner)
//! POST /venue/add                      - Create venue (owner)
//! GET  /venue/{id}/edit                - Edit form (owner)
//! POST /venue/{id}/edit                - Update venue (owner)
//! POST /venue/{id}/delete              - Delete venue (owner)
//! POST /venue/{id}/review              - Add review (customer)
//!
//! # Reservations (customer)
//! POST /reservation/{id}/create        - Reserve venue {id}
//! GET  /reservations                   - Confirmed reservations
//! GET  /reservations/cancelled         - Cancelled reservations
//! GET  /reservations/update/{id}       - Edit form
//! POST /reservations/update/{id}       - Update reservation
//! POST /reservations/cancel/{id}       - Cancel reservation
//!
//! GET  /unauthorized                   - Wrong role (403)
//! ```

pub mod errors;
pub mod home;
pub mod reservations;
pub mod reviews;
pub mod users;
pub mod venues;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, no_store_middleware};
use crate::state::AppState;

/// Login and signup submissions, behind the per-IP rate limiter.
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/user/signup", post(users::signup))
        .route("/user/login", post(users::login))
        .route_layer(auth_rate_limiter())
}

/// Routes open to everybody.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/user/signup", get(users::signup_page))
        .route("/user/login", get(users::login_page))
        .route("/user/logout", post(users::logout))
        .route("/venue/listing", get(venues::listing))
        .route("/venue/{id}", get(venues::show))
        .route("/unauthorized", get(errors::unauthorized))
}

/// Role-gated routes. Their responses are never cached.
pub fn gated_routes() -> Router<AppState> {
    Router::new()
        // Owner
        .route("/venue/form", get(venues::new_form))
        .route("/venue/add", post(venues::create))
        .route(
            "/venue/{id}/edit",
            get(venues::edit_form).post(venues::update),
        )
        .route("/venue/{id}/delete", post(venues::delete))
        // Customer
        .route("/venue/{id}/review", post(reviews::create))
        .route("/reservation/{id}/create", post(reservations::create))
        .route("/reservations", get(reservations::confirmed))
        .route("/reservations/cancelled", get(reservations::cancelled))
        .route(
            "/reservations/update/{id}",
            get(reservations::edit_form).post(reservations::update),
        )
        .route("/reservations/cancel/{id}", post(reservations::cancel))
        .route_layer(middleware::from_fn(no_store_middleware))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(credential_routes())
        .merge(gated_routes())
        .fallback(errors::not_found)
}
