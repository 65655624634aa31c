//! Session middleware configuration and flash messages.
//!
//! Sessions live in `PostgreSQL` (`tower_sessions.session`) and travel in a
//! signed cookie. The signing key is derived from the configured session
//! secret, so rotating the secret logs everybody out.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::WebConfig;
use crate::models::session::keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "venue_verge_session";

/// Fallback inactivity expiry when the configured lifetime does not fit.
const DEFAULT_EXPIRY_SECONDS: i64 = 12 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// # Arguments
///
/// * `pool` - `PostgreSQL` connection pool
/// * `config` - Web configuration (for session secret, lifetime and scheme)
#[must_use]
pub fn create_session_layer(pool: &PgPool, config: &WebConfig) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    // Note: The sessions table must be created via migration
    configure(PostgresStore::new(pool.clone()), config)
}

/// Apply cookie settings to a session layer over any store.
pub(crate) fn configure<S: SessionStore>(store: S, config: &WebConfig) -> SessionManagerLayer<S, SignedCookie> {
    let expiry = tower_sessions::cookie::time::Duration::try_from(config.session_lifetime)
        .unwrap_or_else(|_| tower_sessions::cookie::time::Duration::seconds(DEFAULT_EXPIRY_SECONDS));

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(expiry))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config))
}

/// Derive the 64-byte cookie signing key from the session secret.
fn signing_key(config: &WebConfig) -> Key {
    let digest = Sha512::digest(config.session_secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, message: &str) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::FLASH, message).await
}

/// Take the queued flash message, if any. It is shown once.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn take_flash(session: &Session) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(keys::FLASH).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::testing;

    #[test]
    fn test_signing_key_is_stable_per_secret() {
        let config = testing::config();
        assert_eq!(
            signing_key(&config).master(),
            signing_key(&config).master()
        );

        let mut other = testing::config();
        other.session_secret = "R2l2ZSBtZSBhIGRpZmZlcmVudCBrZXkgcGxlYXNl".into();
        assert_ne!(signing_key(&config).master(), signing_key(&other).master());
    }

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_flash(&session, "Venue created successfully!").await.unwrap();

        assert_eq!(
            take_flash(&session).await.unwrap().as_deref(),
            Some("Venue created successfully!")
        );
        assert_eq!(take_flash(&session).await.unwrap(), None);
    }
}
