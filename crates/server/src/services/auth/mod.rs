//! Authentication service.
//!
//! Passwords are hashed with Argon2. Logins issue opaque bearer tokens
//! (32 random bytes, base64url) stored server-side with a configurable
//! expiry, so a token can be revoked by deleting its session row.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::RngCore;
use sqlx::PgPool;
use tracing::instrument;

use novamart_core::{Email, Role};

use crate::db::{self, RepositoryError};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Number of random bytes in a bearer token.
const TOKEN_BYTES: usize = 32;

/// A logged-in user together with their freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

/// Register a new account and issue a bearer token.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` if the email format is invalid,
/// `AuthError::WeakPassword` if the password doesn't meet requirements, and
/// `AuthError::UserAlreadyExists` if the email is already registered.
#[instrument(skip(pool, password), fields(email = %email, role = %role))]
pub async fn register(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
    token_ttl_days: i64,
) -> Result<AuthenticatedUser, AuthError> {
    let email = Email::parse(email)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let user = db::users::create(pool, name, email.as_str(), &password_hash, role)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

    issue_token(pool, user, token_ttl_days).await
}

/// Login with email and password, issuing a bearer token.
///
/// Blocked accounts are rejected even with a correct password.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the email/password is wrong
/// and `AuthError::Blocked` for blocked accounts.
#[instrument(skip(pool, password), fields(email = %email))]
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    token_ttl_days: i64,
) -> Result<AuthenticatedUser, AuthError> {
    let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

    let (user, password_hash) = db::users::get_with_password_hash(pool, email.as_str())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    verify_password(password, &password_hash)?;

    if user.is_blocked() {
        return Err(AuthError::Blocked);
    }

    issue_token(pool, user, token_ttl_days).await
}

/// Revoke a bearer token. Unknown tokens are a no-op.
///
/// # Errors
///
/// Returns `AuthError::Repository` if the delete fails.
pub async fn logout(pool: &PgPool, token: &str) -> Result<(), AuthError> {
    db::sessions::delete(pool, token).await?;
    Ok(())
}

async fn issue_token(
    pool: &PgPool,
    user: User,
    token_ttl_days: i64,
) -> Result<AuthenticatedUser, AuthError> {
    let token = generate_token();
    let expires_at = Utc::now() + Duration::days(token_ttl_days);

    db::sessions::create(pool, user.id, &token, expires_at).await?;

    Ok(AuthenticatedUser { user, token })
}

/// Generate an opaque bearer token.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Validate that a password meets minimum requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_generate_token_is_unique_and_urlsafe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        // 32 bytes -> 43 base64url chars without padding
        assert_eq!(a.len(), 43);
    }
}
