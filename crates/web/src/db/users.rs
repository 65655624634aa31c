//! User repository for database operations.

use std::time::Duration;

use sqlx::PgPool;

use venue_verge_core::{Email, Role, UserId};

use super::{RepositoryError, UserStore, bounded, classify};
use crate::models::session::CurrentUser;
use crate::models::user::{NewUser, StoredCredentials};

/// Row returned by the login lookup.
#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: UserId,
    name: String,
    role: Role,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
    write_timeout: Duration,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, write_timeout: Duration) -> Self {
        Self {
            pool,
            write_timeout,
        }
    }

    /// Insert a new, activated user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Timeout` if the insert exceeds the write bound.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
        bounded(self.write_timeout, async {
            sqlx::query_scalar::<_, UserId>(
                r"
                INSERT INTO users (name, email, role, password_hash, activated)
                VALUES ($1, $2, $3, $4, TRUE)
                RETURNING id
                ",
            )
            .bind(&user.name)
            .bind(user.email.as_str())
            .bind(user.role)
            .bind(&user.password_hash)
            .fetch_one(self.pool)
            .await
            .map_err(classify)
        })
        .await
    }

    /// Get the password hash of an activated user by email.
    ///
    /// Returns `None` if no activated user has that email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r"
            SELECT id, name, role, password_hash
            FROM users
            WHERE lower(email) = lower($1) AND activated = TRUE
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| StoredCredentials {
            user: CurrentUser {
                id: r.id,
                role: r.role,
                name: r.name,
            },
            password_hash: r.password_hash,
        }))
    }
}

impl UserStore for UserRepository<'_> {
    async fn insert(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
        self.create(user).await
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        self.get_credentials(email).await
    }
}
