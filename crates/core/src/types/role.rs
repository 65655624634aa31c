//! User roles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a role code is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// The role a user picks at signup.
///
/// Stored as an integer (`1` owner, `2` customer) and submitted by the signup
/// form as the same digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum Role {
    /// May create, edit and delete venues.
    Owner = 1,
    /// May reserve venues and leave reviews.
    Customer = 2,
}

impl Role {
    /// The integer code used in forms and in the `users.role` column.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look a role up by its integer code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Owner),
            2 => Some(Self::Customer),
            _ => None,
        }
    }

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Owner => "Venue owner",
            Self::Customer => "Customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    /// Accepts the form codes (`"1"`, `"2"`) and the names (`"owner"`, `"customer"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "owner" => Ok(Self::Owner),
            "2" | "customer" => Ok(Self::Customer),
            other => Err(RoleError(other.to_owned())),
        }
    }
}
