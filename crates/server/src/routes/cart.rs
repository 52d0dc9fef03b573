//! The authenticated user's shopping cart.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use novamart_core::ProductId;

use crate::db::{self, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::CartView;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add))
        .route("/update", put(update))
        .route("/remove/{productId}", delete(remove))
        .route("/clear", delete(clear))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddRequest {
    product_id: Option<ProductId>,
    qty: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest {
    product_id: Option<ProductId>,
    qty: Option<i32>,
}

async fn get_cart(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>> {
    let cart = load_cart(&state, user.id).await?;
    Ok(Json(json!({ "cart": cart })))
}

async fn add(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<AddRequest>,
) -> Result<impl IntoResponse> {
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::Validation("productId is required".to_string()))?;
    let qty = validate_qty(body.qty.unwrap_or(1))?;

    db::products::get(state.pool(), product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let cart_id = db::carts::get_or_create(state.pool(), user.id).await?;
    db::carts::add_item(state.pool(), cart_id, product_id, qty).await?;

    let cart = db::carts::view(state.pool(), cart_id).await?;
    Ok((StatusCode::CREATED, Json(json!({ "cart": cart }))))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<UpdateRequest>,
) -> Result<Json<serde_json::Value>> {
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::Validation("productId is required".to_string()))?;
    let qty = validate_qty(body.qty.unwrap_or(0))?;

    let cart_id = db::carts::get_or_create(state.pool(), user.id).await?;
    db::carts::set_item_qty(state.pool(), cart_id, product_id, qty)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("Item not found in cart".to_string())
            }
            other => AppError::Repository(other),
        })?;

    let cart = db::carts::view(state.pool(), cart_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    let cart_id = db::carts::get_or_create(state.pool(), user.id).await?;
    db::carts::remove_item(state.pool(), cart_id, product_id).await?;

    let cart = db::carts::view(state.pool(), cart_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

async fn clear(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>> {
    let cart_id = db::carts::get_or_create(state.pool(), user.id).await?;
    db::carts::clear(state.pool(), cart_id).await?;

    let cart = db::carts::view(state.pool(), cart_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

async fn load_cart(state: &AppState, user_id: novamart_core::UserId) -> Result<CartView> {
    let cart_id = db::carts::get_or_create(state.pool(), user_id).await?;
    Ok(db::carts::view(state.pool(), cart_id).await?)
}

fn validate_qty(qty: i32) -> Result<i32> {
    if qty >= 1 {
        Ok(qty)
    } else {
        Err(AppError::Validation("qty must be >= 1".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_qty() {
        assert_eq!(validate_qty(1).unwrap(), 1);
        assert_eq!(validate_qty(10).unwrap(), 10);
        assert!(validate_qty(0).is_err());
        assert!(validate_qty(-3).is_err());
    }
}
