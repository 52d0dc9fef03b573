//! Shopper-facing order endpoints: checkout, history, and cancellation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use novamart_core::{OrderId, OrderStatus, Role};

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::ShippingAddress;
use crate::services::orders::{ClientOrderItem, authorize_owner_cancel, place_order};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/place", post(place))
        .route("/my", get(my_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/cancel", put(cancel))
}

#[derive(Debug, Deserialize)]
struct PlaceOrderRequest {
    address: Option<ShippingAddress>,
    /// Fallback line items when the server-side cart is empty.
    #[serde(default)]
    items: Vec<ClientOrderItem>,
    /// Client-computed total, honored only on the fallback path.
    total: Option<Decimal>,
}

async fn place(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse> {
    let address = body
        .address
        .ok_or_else(|| AppError::Validation("Address is required".to_string()))?;

    let order = place_order(state.pool(), user.id, address, body.items, body.total).await?;

    Ok((StatusCode::CREATED, Json(json!({ "order": order }))))
}

async fn my_orders(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>> {
    let orders = db::orders::list_for_user(state.pool(), user.id).await?;
    Ok(Json(json!({ "orders": orders })))
}

/// Owners see their own orders; admins see any.
async fn get_order(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let order = db::orders::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.user_id != user.id && user.role != Role::Admin {
        return Err(AppError::Forbidden("Forbidden".to_string()));
    }

    Ok(Json(json!({ "order": order })))
}

async fn cancel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let order = db::orders::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    authorize_owner_cancel(&order, user.id)?;

    let order = db::orders::update_status(state.pool(), id, OrderStatus::Cancelled).await?;

    Ok(Json(json!({ "message": "Order cancelled", "order": order })))
}
