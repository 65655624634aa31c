//! Venue Verge Core - Domain types and rules.
//!
//! This crate holds everything about venues, reservations and users that can
//! be decided without touching the network or the database:
//!
//! - [`types`] - Newtype IDs, `Email`, `Role`, `ReservationStatus`
//! - [`validator`] - Field-error accumulator and reusable predicates
//! - [`rules`] - Per-entity validation policies (venue, reservation, signup, review)
//! - [`lifecycle`] - Reservation state transitions
//! - [`auth`] - The authenticated `Principal` and the role gate
//!
//! The `web` crate turns HTTP forms into the input types defined here and
//! persists the validated results; the `cli` crate reuses the signup rules.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod lifecycle;
pub mod rules;
pub mod types;
pub mod validator;

pub use auth::{AccessDenied, Principal, authorize};
pub use lifecycle::LifecycleError;
pub use types::*;
pub use validator::{FieldErrors, Validator};
