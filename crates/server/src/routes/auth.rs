//! Registration, login, and logout.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use novamart_core::Role;

use crate::error::{AppError, Result};
use crate::middleware::bearer_token_from_headers;
use crate::models::User;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    /// Accepted at registration time so seller signup is a single step.
    role: Option<Role>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    user: User,
    token: String,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let authed = services::auth::register(
        state.pool(),
        body.name.trim(),
        &body.email,
        &body.password,
        body.role.unwrap_or(Role::User),
        state.config().token_ttl_days,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: authed.user,
            token: authed.token,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let authed = services::auth::login(
        state.pool(),
        &body.email,
        &body.password,
        state.config().token_ttl_days,
    )
    .await?;

    Ok(Json(AuthResponse {
        user: authed.user,
        token: authed.token,
    }))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let token = bearer_token_from_headers(&headers)?;
    services::auth::logout(state.pool(), token).await?;

    Ok(Json(json!({ "message": "Logged out" })))
}
