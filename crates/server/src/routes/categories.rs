//! Public category listing.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::db;
use crate::error::Result;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}

/// Active categories only, sorted by name.
async fn list(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    super::guard_maintenance(&state).await?;

    let categories = db::categories::list_active(state.pool()).await?;
    Ok(Json(json!({ "categories": categories })))
}
