//! Error pages reachable by URL.

use axum::{http::StatusCode, response::Response};

use crate::error::error_page;
use crate::middleware::PageContext;

/// Where the role gate sends users holding the wrong role.
pub async fn unauthorized(ctx: PageContext) -> Response {
    error_page(StatusCode::FORBIDDEN, ctx)
}

/// Fallback for unknown paths.
pub async fn not_found(ctx: PageContext) -> Response {
    error_page(StatusCode::NOT_FOUND, ctx)
}
