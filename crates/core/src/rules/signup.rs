//! Signup form validation.

use serde::{Deserialize, Serialize};

use super::{MSG_INVALID_EMAIL, MSG_REQUIRED, too_long};
use crate::types::{Email, Role};
use crate::validator::{
    FieldErrors, Validator, is_permitted_value, is_valid_email, max_chars, min_chars, not_blank,
};

/// Shortest accepted password, in characters.
pub const PASSWORD_MIN: usize = 10;
/// Longest accepted password, in characters.
pub const PASSWORD_MAX: usize = 50;

/// Raw signup form fields.
///
/// `Debug` is written by hand so the password never reaches a log line.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl std::fmt::Debug for SignupInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Fields echoed back into a re-rendered signup form. The password is never
/// echoed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupEcho {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl SignupInput {
    #[must_use]
    pub fn echo(&self) -> SignupEcho {
        SignupEcho {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// A validated account request. The password is still plaintext and must be
/// hashed before it is stored.
#[derive(Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub role: Role,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Validate a signup form.
///
/// # Errors
///
/// Returns the field errors when any check fails.
pub fn validate_signup(input: &SignupInput) -> Result<NewAccount, FieldErrors> {
    let mut v = Validator::new();

    v.check(not_blank(&input.password), "password", MSG_REQUIRED);
    v.check(
        min_chars(&input.password, PASSWORD_MIN),
        "password",
        "must be at least 10 characters long",
    );
    v.check(
        max_chars(&input.password, PASSWORD_MAX),
        "password",
        &too_long(PASSWORD_MAX),
    );

    v.check(not_blank(&input.name), "name", MSG_REQUIRED);
    v.check(max_chars(&input.name, 50), "name", &too_long(50));

    v.check(not_blank(&input.email), "email", MSG_REQUIRED);
    v.check(is_valid_email(&input.email), "email", MSG_INVALID_EMAIL);
    v.check(max_chars(&input.email, Email::MAX_LENGTH), "email", &too_long(Email::MAX_LENGTH));

    v.check(
        is_permitted_value(&input.role.trim(), &["1", "2"]),
        "role",
        MSG_REQUIRED,
    );

    v.finish()?;

    let email =
        Email::parse(&input.email).map_err(|_| FieldErrors::single("email", MSG_INVALID_EMAIL))?;
    let role = input
        .role
        .parse::<Role>()
        .map_err(|_| FieldErrors::single("role", MSG_REQUIRED))?;

    Ok(NewAccount {
        name: input.name.clone(),
        email,
        password: input.password.clone(),
        role,
    })
}
