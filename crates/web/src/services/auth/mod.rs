//! Authentication service.
//!
//! Password signup and login. Passwords are hashed with Argon2id and the
//! stored PHC string carries its own salt and parameters.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use venue_verge_core::rules::{SignupInput, validate_signup};
use venue_verge_core::{Email, UserId};

use crate::db::{RepositoryError, UserStore};
use crate::models::session::CurrentUser;
use crate::models::user::NewUser;

/// Hash verified when the email is unknown, so both login failures cost the same.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("venue-verge timing equaliser").ok());

/// Authentication service.
pub struct AuthService<S> {
    users: S,
}

impl<S: UserStore> AuthService<S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: S) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form fails the signup rules.
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    pub async fn signup(&self, input: &SignupInput) -> Result<UserId, AuthError> {
        let account = validate_signup(input).map_err(AuthError::Validation)?;
        let password_hash = hash_password(&account.password)?;

        let user = NewUser {
            name: account.name,
            email: account.email,
            role: account.role,
            password_hash,
        };

        let id = self.users.insert(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(user_id = %id, role = %user.role, "User signed up");
        Ok(id)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if there is no activated user
    /// with this email or the password does not match. The two cases are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let stored = match Email::parse(email) {
            Ok(email) => self.users.find_credentials(&email).await?,
            Err(_) => None,
        };

        let Some(stored) = stored else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &stored.password_hash)?;
        Ok(stored.user)
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password doesn't match or
/// the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use venue_verge_core::Role;

    use super::*;
    use crate::models::user::StoredCredentials;

    /// In-memory user table with a case-insensitive unique email.
    #[derive(Default)]
    struct MemoryUsers {
        rows: Mutex<Vec<(UserId, NewUser)>>,
    }

    impl UserStore for MemoryUsers {
        async fn insert(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let taken = rows
                .iter()
                .any(|(_, u)| u.email.as_str().eq_ignore_ascii_case(user.email.as_str()));
            if taken {
                return Err(RepositoryError::Conflict("users_email_key".to_owned()));
            }
            let id = UserId::new(i32::try_from(rows.len()).unwrap() + 1);
            rows.push((id, user.clone()));
            Ok(id)
        }

        async fn find_credentials(
            &self,
            email: &Email,
        ) -> Result<Option<StoredCredentials>, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .find(|(_, u)| u.email.as_str().eq_ignore_ascii_case(email.as_str()))
                .map(|(id, u)| StoredCredentials {
                    user: CurrentUser {
                        id: *id,
                        role: u.role,
                        name: u.name.clone(),
                    },
                    password_hash: u.password_hash.clone(),
                }))
        }
    }

    fn signup_form(email: &str, role: &str) -> SignupInput {
        SignupInput {
            name: "Carla Customer".to_owned(),
            email: email.to_owned(),
            password: "a long enough password".to_owned(),
            role: role.to_owned(),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("test_password_123", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong_password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_signup_then_authenticate() {
        let service = AuthService::new(MemoryUsers::default());
        let id = service
            .signup(&signup_form("carla@example.com", "2"))
            .await
            .unwrap();

        let user = service
            .authenticate("carla@example.com", "a long enough password")
            .await
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.name, "Carla Customer");
    }

    #[tokio::test]
    async fn test_signup_validation_errors() {
        let service = AuthService::new(MemoryUsers::default());
        let err = service
            .signup(&signup_form("not-an-email", "7"))
            .await
            .unwrap_err();
        let AuthError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.get("email"), Some("invalid email address"));
        assert_eq!(errors.get("role"), Some("must be provided"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_reported() {
        let service = AuthService::new(MemoryUsers::default());
        service
            .signup(&signup_form("dup@example.com", "1"))
            .await
            .unwrap();
        let err = service
            .signup(&signup_form("DUP@example.com", "2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_the_same() {
        let service = AuthService::new(MemoryUsers::default());
        service
            .signup(&signup_form("known@example.com", "2"))
            .await
            .unwrap();

        let unknown = service
            .authenticate("nobody@example.com", "a long enough password")
            .await
            .unwrap_err();
        let wrong = service
            .authenticate("known@example.com", "not the password")
            .await
            .unwrap_err();
        let malformed = service.authenticate("", "").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(malformed, AuthError::InvalidCredentials));
    }
}
