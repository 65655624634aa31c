//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use venue_verge_core::{Principal, Role, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user and
/// gate routes by role without a database round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Role chosen at signup.
    pub role: Role,
    /// Display name for the navigation bar.
    pub name: String,
}

impl CurrentUser {
    /// The principal passed to authorization checks.
    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the one-shot flash message.
    pub const FLASH: &str = "flash";

    /// Key for the per-session CSRF token.
    pub const CSRF_TOKEN: &str = "csrf_token";
}
