//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! vv-cli migrate
//! ```
//!
//! Migrations live in `crates/web/migrations/` and are embedded at compile
//! time. The server never runs them on startup.

use thiserror::Error;

use super::{DATABASE_URL_VAR, database_url};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let url = database_url().ok_or(MigrationError::MissingEnvVar(DATABASE_URL_VAR))?;

    tracing::info!("Connecting to database...");
    let pool = venue_verge_web::db::create_pool(&url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
