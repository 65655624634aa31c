//! Per-entity validation policies.
//!
//! Each rule takes raw form input, runs its checks in a fixed order through a
//! [`Validator`](crate::Validator) and returns either a typed, validated value
//! or the [`FieldErrors`](crate::FieldErrors) to show beside the form fields.
//! Field keys are the HTML form field names.

pub mod reservation;
pub mod review;
pub mod signup;
pub mod venue;

pub use reservation::{ReservationInput, ReservationSlot, validate_reservation};
pub use review::{ReviewInput, validate_review};
pub use signup::{NewAccount, SignupEcho, SignupInput, validate_signup};
pub use venue::{VenueDraft, VenueInput, parse_or_zero, validate_venue};

/// Message for a required field that is missing or blank.
pub const MSG_REQUIRED: &str = "must be provided";
/// Message for a malformed e-mail address.
pub const MSG_INVALID_EMAIL: &str = "invalid email address";

/// "must not be more than N characters long"
pub(crate) fn too_long(max: usize) -> String {
    format!("must not be more than {max} characters long")
}
