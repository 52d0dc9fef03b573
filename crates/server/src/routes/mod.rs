//! HTTP route handlers.
//!
//! Handlers parse and validate input, call into `services` and `db`, and
//! shape JSON responses. Everything mounts under `/api`.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod seller;
pub mod users;

use axum::Router;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::StoreSettings;
use crate::state::AppState;

/// Build the `/api` router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/seller", seller::router())
        .nest("/admin", admin::router())
}

/// Load the store settings and reject the request when maintenance mode is
/// on. Public browsing endpoints call this first; authenticated surfaces
/// stay reachable so admins can turn maintenance back off.
pub(crate) async fn guard_maintenance(state: &AppState) -> Result<StoreSettings> {
    let settings = db::settings::get(state.pool()).await?;
    if settings.maintenance_mode {
        return Err(AppError::Maintenance);
    }
    Ok(settings)
}
