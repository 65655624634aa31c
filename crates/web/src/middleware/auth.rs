//! Authentication middleware and extractors.
//!
//! The logged-in user lives in the session under
//! [`keys::CURRENT_USER`]. Handlers declare the role they need by taking
//! [`RequireOwner`] or [`RequireCustomer`]; the check itself is
//! [`venue_verge_core::authorize`], so the gate is role-only.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use venue_verge_core::{AccessDenied, Role, authorize};

use crate::models::session::{CurrentUser, keys};

/// Path unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/user/login";

/// Path users with the wrong role are sent to.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Error returned when a role-gated route is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Nobody is logged in.
    RedirectToLogin,
    /// Logged in, but with the other role.
    RedirectToUnauthorized,
}

impl From<AccessDenied> for AuthRejection {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => Self::RedirectToLogin,
            AccessDenied::WrongRole { .. } => Self::RedirectToUnauthorized,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::RedirectToUnauthorized => Redirect::to(UNAUTHORIZED_PATH).into_response(),
        }
    }
}

async fn load_current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

async fn require_role(parts: &Parts, role: Role) -> Result<CurrentUser, AuthRejection> {
    let user = load_current_user(parts).await;
    let principal = user.as_ref().map(CurrentUser::principal);
    authorize(principal.as_ref(), role)?;
    // authorize only succeeds with a principal, which only exists with a user
    user.ok_or(AuthRejection::RedirectToLogin)
}

/// Extractor for routes reserved to venue owners.
///
/// ```rust,ignore
/// async fn new_venue(RequireOwner(owner): RequireOwner) -> impl IntoResponse {
///     format!("Hello, {}!", owner.name)
/// }
/// ```
pub struct RequireOwner(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireOwner
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, Role::Owner).await.map(Self)
    }
}

/// Extractor for routes reserved to customers.
pub struct RequireCustomer(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, Role::Customer).await.map(Self)
    }
}

/// Helper to set the current user in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(keys::CURRENT_USER).await?;
    session.cycle_id().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};
    use venue_verge_core::UserId;

    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(7),
            role,
            name: "Ada".to_string(),
        }
    }

    /// Router whose `/login-as-*` routes log in and whose gated routes echo the name.
    fn app() -> Router {
        Router::new()
            .route(
                "/login-as-owner",
                get(|session: Session| async move {
                    set_current_user(&session, &user(Role::Owner)).await.unwrap();
                }),
            )
            .route(
                "/login-as-customer",
                get(|session: Session| async move {
                    set_current_user(&session, &user(Role::Customer)).await.unwrap();
                }),
            )
            .route(
                "/owner",
                get(|RequireOwner(u): RequireOwner| async move { u.name }),
            )
            .route(
                "/customer",
                get(|RequireCustomer(u): RequireCustomer| async move { u.name }),
            )
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
    }

    async fn login(app: &Router, path: &str) -> String {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        cookie.split(';').next().unwrap().to_string()
    }

    async fn get_with(app: &Router, path: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::get(path);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_is_sent_to_login() {
        let app = app();
        let response = get_with(&app, "/owner", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_customer_is_denied_owner_route() {
        let app = app();
        let cookie = login(&app, "/login-as-customer").await;
        let response = get_with(&app, "/owner", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), UNAUTHORIZED_PATH);
    }

    #[tokio::test]
    async fn test_owner_is_denied_customer_route() {
        let app = app();
        let cookie = login(&app, "/login-as-owner").await;
        let response = get_with(&app, "/customer", Some(&cookie)).await;
        assert_eq!(location(&response), UNAUTHORIZED_PATH);
    }

    #[tokio::test]
    async fn test_matching_role_passes() {
        let app = app();
        let cookie = login(&app, "/login-as-owner").await;
        let response = get_with(&app, "/owner", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_access_denied_maps_to_redirects() {
        assert_eq!(
            AuthRejection::from(AccessDenied::Unauthenticated),
            AuthRejection::RedirectToLogin
        );
        assert_eq!(
            AuthRejection::from(AccessDenied::WrongRole {
                required: Role::Owner
            }),
            AuthRejection::RedirectToUnauthorized
        );
    }
}
