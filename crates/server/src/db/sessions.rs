//! Database operations for bearer token sessions.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use novamart_core::UserId;

use super::RepositoryError;
use crate::models::{Session, User};

/// Persist a new session token for a user.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
#[instrument(skip(pool, token))]
pub async fn create(
    pool: &PgPool,
    user_id: UserId,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<Session, RepositoryError> {
    let session = sqlx::query_as::<_, Session>(
        r"
        INSERT INTO sessions (user_id, token, expires_at)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, token, expires_at, created_at
        ",
    )
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// Resolve a bearer token to its user, if the session exists and has not
/// expired.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[instrument(skip(pool, token))]
pub async fn resolve_user(pool: &PgPool, token: &str) -> Result<Option<User>, RepositoryError> {
    let user = sqlx::query_as::<_, User>(
        r"
        SELECT u.id, u.name, u.email, u.role, u.status, u.created_at, u.updated_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > now()
        ",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Delete a session token (logout). Absent tokens are a no-op.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
#[instrument(skip(pool, token))]
pub async fn delete(pool: &PgPool, token: &str) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove expired sessions. Returns the number of rows pruned.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
#[instrument(skip(pool))]
pub async fn prune_expired(pool: &PgPool) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
