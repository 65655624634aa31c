//! CSRF protection.
//!
//! Each session carries one random token. Pages embed it in every form as the
//! `csrf_token` field; scripts may send it as the `x-csrf-token` header
//! instead. Unsafe requests without a matching token are refused with 403.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tower_sessions::Session;

use crate::models::session::keys;

/// Form field carrying the token.
pub const CSRF_FIELD: &str = "csrf_token";

/// Header carrying the token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Largest form body buffered for token extraction.
const MAX_FORM_BYTES: usize = 64 * 1024;

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// The session's CSRF token, created on first use.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn csrf_token(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = session.get::<String>(keys::CSRF_TOKEN).await? {
        return Ok(token);
    }
    let token = generate_token();
    session.insert(keys::CSRF_TOKEN, &token).await?;
    Ok(token)
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(expected: &str, given: &str) -> bool {
    expected.len() == given.len()
        && expected
            .bytes()
            .zip(given.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

fn rejection() -> Response {
    (StatusCode::FORBIDDEN, "Forbidden: missing or invalid CSRF token").into_response()
}

/// Middleware that checks the CSRF token on unsafe requests.
///
/// Form bodies are buffered to read the token and then handed on unchanged.
pub async fn csrf_middleware(session: Session, request: Request, next: Next) -> Response {
    if is_safe(request.method()) {
        return next.run(request).await;
    }

    let expected = match session.get::<String>(keys::CSRF_TOKEN).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            tracing::warn!(uri = %request.uri(), "CSRF check failed: session has no token");
            return rejection();
        }
        Err(e) => {
            tracing::error!(error = %e, "CSRF check failed: session unavailable");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if let Some(given) = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        if tokens_match(&expected, given) {
            return next.run(request).await;
        }
        tracing::warn!(uri = %request.uri(), "CSRF check failed: header token mismatch");
        return rejection();
    }

    if !is_form(&request) {
        tracing::warn!(uri = %request.uri(), "CSRF check failed: no token supplied");
        return rejection();
    }

    let (parts, body) = request.into_parts();
    let Ok(bytes) = to_bytes(body, MAX_FORM_BYTES).await else {
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    };

    let given = url::form_urlencoded::parse(&bytes)
        .find(|(key, _)| key == CSRF_FIELD)
        .map(|(_, value)| value.into_owned());

    match given {
        Some(given) if tokens_match(&expected, &given) => {
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        _ => {
            tracing::warn!(uri = %parts.uri, "CSRF check failed: form token missing or mismatched");
            rejection()
        }
    }
}
