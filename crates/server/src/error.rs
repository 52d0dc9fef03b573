//! Unified error handling.
//!
//! Provides a unified `AppError` type that maps every failure to a JSON
//! `{"message": ...}` body with the right status code. All route handlers
//! return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the marketplace API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to touch this resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store is in maintenance mode; public browsing is suspended.
    #[error("Store is under maintenance")]
    Maintenance,

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with the internal detail that must not reach clients
        if matches!(self, Self::Repository(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Maintenance => StatusCode::SERVICE_UNAVAILABLE,
            Self::Auth(err) => err.status_code(),
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Validation(msg) | Self::Unauthorized(msg) | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::Maintenance => {
                "Store is under maintenance. Please try again later.".to_string()
            }
            Self::Auth(err) => err.user_message(),
            Self::Repository(err) => match err {
                RepositoryError::NotFound => "Not found".to_string(),
                RepositoryError::Conflict(msg) => msg.clone(),
                _ => "Internal server error".to_string(),
            },
            Self::Internal(_) => "Internal server error".to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Order not found".to_string());
        assert_eq!(err.to_string(), "Not found: Order not found");

        let err = AppError::Validation("qty must be >= 1".to_string());
        assert_eq!(err.to_string(), "Validation error: qty must be >= 1");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unauthorized("no token".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("nope".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::NotFound("gone".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Maintenance),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_repository_conflict_maps_to_400() {
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::Conflict(
                "Category already exists".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
    }
}
