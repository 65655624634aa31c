//! Panic recovery.
//!
//! A panicking handler must not take the connection down with it. The panic is
//! logged (and reaches Sentry through the tracing layer) and the client gets a
//! bare 500 with the connection closed.

use std::any::Any;

use axum::{
    http::{HeaderValue, StatusCode, header::CONNECTION},
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

/// Turn a caught panic payload into a response.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = %detail, "handler panicked");

    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    response
        .headers_mut()
        .insert(CONNECTION, HeaderValue::from_static("close"));
    response
}

/// Layer that catches handler panics with [`handle_panic`].
#[must_use]
pub fn recover_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic as fn(Box<dyn Any + Send + 'static>) -> Response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_panic_becomes_500() {
        #[allow(clippy::panic)]
        async fn boom() -> &'static str {
            panic!("venue table on fire")
        }

        let app = Router::new()
            .route("/", get(boom))
            .route("/fine", get(|| async { "ok" }))
            .layer(recover_layer());

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONNECTION], "close");

        let response = app
            .oneshot(Request::get("/fine").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_handles_str_and_string_payloads() {
        assert_eq!(
            handle_panic(Box::new("static")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            handle_panic(Box::new(String::from("owned"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
