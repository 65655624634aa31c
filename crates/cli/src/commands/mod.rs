//! CLI command implementations.

pub mod migrate;
pub mod user;

use secrecy::SecretString;

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "VENUE_VERGE_DATABASE_URL";

/// Read the database URL, falling back to the generic `DATABASE_URL`.
///
/// Returns `None` when neither variable is set.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
}
