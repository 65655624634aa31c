//! Reservation status transitions.
//!
//! ```text
//!   create ──▶ Confirmed ──cancel / update(status=2)──▶ Cancelled ─┐
//!                                                        ▲         │ cancel
//!                                                        └─────────┘
//! ```
//!
//! A cancelled reservation stays cancelled; `update` may not move it back.

use thiserror::Error;

use crate::types::ReservationStatus;
use crate::validator::FieldErrors;

/// Form field that carries the requested status.
pub const STATUS_FIELD: &str = "status";

/// A status change the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The submitted status is neither `1` nor `2`.
    #[error("status must be confirmed or cancelled")]
    UnknownStatus,

    /// `Cancelled → Confirmed`.
    #[error("a cancelled reservation cannot be reinstated")]
    CannotReinstate,
}

impl LifecycleError {
    /// The error as a form field error on `status`.
    #[must_use]
    pub fn into_field_errors(self) -> FieldErrors {
        FieldErrors::single(STATUS_FIELD, self.to_string())
    }
}

/// The state after a cancel. Cancelling twice is a no-op.
#[must_use]
pub const fn cancel(_current: ReservationStatus) -> ReservationStatus {
    ReservationStatus::Cancelled
}

/// Read the optional status field of the update form.
///
/// A blank value means "keep the current status".
///
/// # Errors
///
/// Returns [`LifecycleError::UnknownStatus`] for any other unrecognised value.
pub fn requested_status(raw: Option<&str>) -> Result<Option<ReservationStatus>, LifecycleError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => code
            .parse()
            .map(Some)
            .map_err(|_| LifecycleError::UnknownStatus),
    }
}

/// Resolve the status an update should store.
///
/// # Errors
///
/// Returns [`LifecycleError::CannotReinstate`] when a cancelled reservation
/// is asked to become confirmed again.
pub const fn apply_update(
    current: ReservationStatus,
    requested: Option<ReservationStatus>,
) -> Result<ReservationStatus, LifecycleError> {
    match (current, requested) {
        (current, None) => Ok(current),
        (ReservationStatus::Cancelled, Some(ReservationStatus::Confirmed)) => {
            Err(LifecycleError::CannotReinstate)
        }
        (_, Some(next)) => Ok(next),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ReservationStatus::{Cancelled, Confirmed};

    #[test]
    fn test_cancel_is_idempotent() {
        assert_eq!(cancel(Confirmed), Cancelled);
        assert_eq!(cancel(cancel(Confirmed)), Cancelled);
    }

    #[test]
    fn test_update_without_status_keeps_current() {
        assert_eq!(apply_update(Confirmed, None), Ok(Confirmed));
        assert_eq!(apply_update(Cancelled, None), Ok(Cancelled));
    }

    #[test]
    fn test_update_may_cancel() {
        assert_eq!(apply_update(Confirmed, Some(Cancelled)), Ok(Cancelled));
        assert_eq!(apply_update(Cancelled, Some(Cancelled)), Ok(Cancelled));
        assert_eq!(apply_update(Confirmed, Some(Confirmed)), Ok(Confirmed));
    }

    #[test]
    fn test_update_cannot_reinstate() {
        assert_eq!(
            apply_update(Cancelled, Some(Confirmed)),
            Err(LifecycleError::CannotReinstate)
        );
        let errors = LifecycleError::CannotReinstate.into_field_errors();
        assert_eq!(
            errors.get("status"),
            Some("a cancelled reservation cannot be reinstated")
        );
    }

    #[test]
    fn test_requested_status() {
        assert_eq!(requested_status(None), Ok(None));
        assert_eq!(requested_status(Some(" ")), Ok(None));
        assert_eq!(requested_status(Some("2")), Ok(Some(Cancelled)));
        assert_eq!(
            requested_status(Some("9")),
            Err(LifecycleError::UnknownStatus)
        );
    }
}
