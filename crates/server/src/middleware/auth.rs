//! Bearer token authentication extractors.
//!
//! `AuthUser` resolves the `Authorization: Bearer <token>` header against the
//! sessions table on every request, so revoking a session takes effect
//! immediately. `RequireSeller` and `RequireAdmin` layer a role check on top.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use novamart_core::Role;

use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Any authenticated, non-blocked user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// An authenticated user with the seller or admin role.
#[derive(Debug, Clone)]
pub struct RequireSeller(pub User);

/// An authenticated user with the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

/// Pull the bearer token out of the Authorization header.
pub(crate) fn bearer_token_from_headers(headers: &axum::http::HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("No token".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token_from_headers(&parts.headers)?;

    let user = db::sessions::resolve_user(state.pool(), token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

    if user.is_blocked() {
        return Err(AppError::Forbidden("Account blocked by admin".to_string()));
    }

    Ok(user)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireSeller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        // Admins may use seller endpoints
        match user.role {
            Role::Seller | Role::Admin => Ok(Self(user)),
            Role::User => Err(AppError::Forbidden("Seller access only".to_string())),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        if user.role == Role::Admin {
            Ok(Self(user))
        } else {
            Err(AppError::Forbidden("Admin access only".to_string()))
        }
    }
}
