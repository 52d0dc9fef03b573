//! Authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

use novamart_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email is already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account has been blocked by an admin.
    #[error("account blocked")]
    Blocked,

    /// Password hashing failed.
    #[error("password hashing error: {0}")]
    Hash(String),

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) | Self::WeakPassword(_) | Self::UserAlreadyExists => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Blocked => StatusCode::FORBIDDEN,
            Self::Hash(_) | Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal failures stay generic.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(e) => e.to_string(),
            Self::WeakPassword(msg) => msg.clone(),
            Self::UserAlreadyExists => "User already exists".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::Blocked => "Your account is blocked by admin".to_string(),
            Self::Hash(_) | Self::Repository(_) => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Blocked.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::UserAlreadyExists.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Hash("oops".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_messages_stay_generic() {
        assert_eq!(
            AuthError::Hash("argon2 detail".to_string()).user_message(),
            "Internal server error"
        );
    }

    #[test]
    fn test_blocked_message() {
        assert_eq!(
            AuthError::Blocked.user_message(),
            "Your account is blocked by admin"
        );
    }
}
