//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. Panic recovery ([`recover_layer`])
//! 3. `TraceLayer` (request span)
//! 4. Request ID and request logging
//! 5. Request timeout
//! 6. Security headers (`Cache-Control: no-store` on role-gated routes)
//! 7. Session layer (tower-sessions with `PostgreSQL` store)
//! 8. CSRF token check
//! 9. Rate limiting on credential endpoints (governor)
//!
//! Role gating is done by the [`RequireOwner`] and [`RequireCustomer`]
//! extractors rather than by a layer.

pub mod auth;
pub mod csrf;
pub mod page_context;
pub mod rate_limit;
pub mod recover;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, RequireCustomer, RequireOwner, clear_current_user, set_current_user,
};
pub use csrf::{csrf_middleware, csrf_token};
pub use page_context::PageContext;
pub use rate_limit::auth_rate_limiter;
pub use recover::recover_layer;
pub use request_id::request_id_middleware;
pub use security_headers::{no_store_middleware, security_headers_middleware};
pub use session::{create_session_layer, set_flash, take_flash};
