//! Per-page context shared by every rendered template.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::csrf::csrf_token;
use super::session::take_flash;
use crate::models::session::{CurrentUser, keys};

/// Data the base layout needs on every page.
///
/// Extracting it consumes the pending flash message, so take it only in
/// handlers that render a page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// One-shot message queued by the previous request.
    pub flash: Option<String>,
    /// The logged-in user, for the navigation bar.
    pub current_user: Option<CurrentUser>,
    /// Token embedded in every form.
    pub csrf_token: String,
}

impl PageContext {
    /// Whether the logged-in user is a venue owner.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|u| u.principal().is_owner())
    }

    /// Whether the logged-in user is a customer.
    #[must_use]
    pub fn is_customer(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|u| u.principal().is_customer())
    }

    /// Load the context from a session.
    pub async fn load(session: &Session) -> Self {
        let flash = take_flash(session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read flash message");
            None
        });
        let current_user = session
            .get::<CurrentUser>(keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let csrf_token = csrf_token(session).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to issue CSRF token");
            String::new()
        });

        Self {
            flash,
            current_user,
            csrf_token,
        }
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) => Ok(Self::load(session).await),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;
    use venue_verge_core::{Role, UserId};

    use super::*;
    use crate::middleware::session::set_flash;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_load_takes_flash_once() {
        let session = session();
        set_flash(&session, "Reservation Made!").await.unwrap();

        let first = PageContext::load(&session).await;
        assert_eq!(first.flash.as_deref(), Some("Reservation Made!"));
        assert!(!first.csrf_token.is_empty());

        let second = PageContext::load(&session).await;
        assert_eq!(second.flash, None);
        assert_eq!(second.csrf_token, first.csrf_token);
    }

    #[tokio::test]
    async fn test_roles() {
        let session = session();
        session
            .insert(
                keys::CURRENT_USER,
                CurrentUser {
                    id: UserId::new(3),
                    role: Role::Owner,
                    name: "Olu".to_string(),
                },
            )
            .await
            .unwrap();

        let ctx = PageContext::load(&session).await;
        assert!(ctx.is_owner());
        assert!(!ctx.is_customer());
        assert!(!PageContext::default().is_owner());
    }
}
