//! Reservation status.
//!
//! Transitions between the states live in [`crate::lifecycle`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a status code is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid reservation status: {0}")]
pub struct StatusError(pub String);

/// State of a reservation, stored as `1` or `2` in `reservation.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum ReservationStatus {
    /// Initial state of every new reservation.
    #[default]
    Confirmed = 1,
    /// Set by cancellation.
    Cancelled = 2,
}

impl ReservationStatus {
    /// The integer code used in forms and in the database.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look a status up by its integer code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Confirmed),
            2 => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether the reservation has been cancelled.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "confirmed" => Ok(Self::Confirmed),
            "2" | "cancelled" => Ok(Self::Cancelled),
            other => Err(StatusError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_confirmed() {
        assert_eq!(ReservationStatus::default(), ReservationStatus::Confirmed);
    }

    #[test]
    fn test_codes() {
        assert_eq!(ReservationStatus::Confirmed.code(), 1);
        assert_eq!(ReservationStatus::Cancelled.code(), 2);
        assert_eq!(
            ReservationStatus::from_code(2),
            Some(ReservationStatus::Cancelled)
        );
        assert_eq!(ReservationStatus::from_code(0), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "2".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Cancelled
        );
        assert_eq!(
            "confirmed".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Confirmed
        );
        assert!("3".parse::<ReservationStatus>().is_err());
    }
}
