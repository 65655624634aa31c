//! User domain types.

use venue_verge_core::{Email, Role};

/// Fields needed to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub password_hash: String,
}

/// What login needs to know about an active account.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: super::session::CurrentUser,
    pub password_hash: String,
}
