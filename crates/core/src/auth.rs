//! Role-based authorization.
//!
//! Authorization is by role only. Any owner may edit or delete any venue; there
//! is no per-resource ownership check.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Role, UserId};

/// The authenticated user behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    #[must_use]
    pub const fn is_owner(&self) -> bool {
        matches!(self.role, Role::Owner)
    }

    #[must_use]
    pub const fn is_customer(&self) -> bool {
        matches!(self.role, Role::Customer)
    }
}

/// Why a role gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// Nobody is logged in.
    #[error("authentication required")]
    Unauthenticated,

    /// Logged in with the wrong role.
    #[error("requires the {required} role")]
    WrongRole { required: Role },
}

/// Check that `principal` exists and holds `required`.
///
/// # Errors
///
/// Returns [`AccessDenied::Unauthenticated`] when there is no principal and
/// [`AccessDenied::WrongRole`] when the role differs.
pub fn authorize(principal: Option<&Principal>, required: Role) -> Result<&Principal, AccessDenied> {
    let principal = principal.ok_or(AccessDenied::Unauthenticated)?;
    if principal.role == required {
        Ok(principal)
    } else {
        Err(AccessDenied::WrongRole { required })
    }
}
