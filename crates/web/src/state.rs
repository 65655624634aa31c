//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::WebConfig;
use crate::db::{ReservationRepository, ReviewRepository, UserRepository, VenueRepository};
use crate::services::auth::AuthService;
use crate::services::reservations::ReservationService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Repositories borrow the pool
/// and are built per call, so handing one out costs nothing.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Web configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: WebConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self.pool(), self.config().write_timeout)
    }

    #[must_use]
    pub fn venues(&self) -> VenueRepository<'_> {
        VenueRepository::new(self.pool(), self.config().write_timeout)
    }

    #[must_use]
    pub fn reviews(&self) -> ReviewRepository<'_> {
        ReviewRepository::new(self.pool(), self.config().write_timeout)
    }

    /// Signup and login over the users table.
    #[must_use]
    pub fn auth(&self) -> AuthService<UserRepository<'_>> {
        AuthService::new(self.users())
    }

    /// Reservation lifecycle over the reservation table.
    #[must_use]
    pub fn reservations(&self) -> ReservationService<ReservationRepository<'_>> {
        ReservationService::new(ReservationRepository::new(
            self.pool(),
            self.config().write_timeout,
        ))
    }
}
