//! Database operations for user accounts.

use sqlx::PgPool;
use tracing::instrument;

use novamart_core::{AccountStatus, Role, UserId};

use super::RepositoryError;
use crate::models::User;

const USER_COLUMNS: &str = "id, name, email, role, status, created_at, updated_at";

/// Create a new user with a pre-hashed password.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email is already registered.
#[instrument(skip(pool, password_hash), fields(email = %email))]
pub async fn create(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, RepositoryError> {
    let user = sqlx::query_as::<_, User>(
        r"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, role, status, created_at, updated_at
        ",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("User already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Ok(user)
}

/// Get a user and their password hash by email, for login.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[instrument(skip(pool), fields(email = %email))]
pub async fn get_with_password_hash(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(User, String)>, RepositoryError> {
    let row = sqlx::query_as::<_, UserWithHash>(
        r"
        SELECT id, name, email, role, status, created_at, updated_at, password_hash
        FROM users
        WHERE email = $1
        ",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| {
        (
            User {
                id: r.id,
                name: r.name,
                email: r.email,
                role: r.role,
                status: r.status,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            r.password_hash,
        )
    }))
}

/// List all users, newest first (admin surface).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<User>, RepositoryError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Update a user's role and/or status (admin surface).
///
/// Unspecified fields are left unchanged.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user does not exist.
#[instrument(skip(pool))]
pub async fn update_role_status(
    pool: &PgPool,
    id: UserId,
    role: Option<Role>,
    status: Option<AccountStatus>,
) -> Result<User, RepositoryError> {
    let user = sqlx::query_as::<_, User>(
        r"
        UPDATE users
        SET role = COALESCE($2, role),
            status = COALESCE($3, status),
            updated_at = now()
        WHERE id = $1
        RETURNING id, name, email, role, status, created_at, updated_at
        ",
    )
    .bind(id)
    .bind(role)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    Ok(user)
}

/// Count all users (admin dashboard).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count(pool: &PgPool) -> Result<i64, RepositoryError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[derive(sqlx::FromRow)]
struct UserWithHash {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    status: AccountStatus,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    password_hash: String,
}
