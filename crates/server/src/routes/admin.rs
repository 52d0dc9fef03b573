//! Admin surface: dashboard stats, orders, users, products, categories, and
//! store settings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use novamart_core::{
    AccountStatus, CategoryId, CategoryStatus, Currency, OrderId, OrderStatus, Role, UserId,
};

use crate::db;
use crate::db::settings::UpdateSettings;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/users", get(list_users))
        .route("/users/{id}", put(update_user))
        .route("/products", get(list_products))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/settings", get(get_settings).put(update_settings))
}

// =============================================================================
// Dashboard
// =============================================================================

async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let total_orders = db::orders::count(state.pool()).await?;
    let total_users = db::users::count(state.pool()).await?;
    let total_revenue = db::orders::total_revenue(state.pool()).await?;

    Ok(Json(json!({
        "totalOrders": total_orders,
        "totalUsers": total_users,
        "totalRevenue": total_revenue,
    })))
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
struct OrderStatusRequest {
    #[serde(default)]
    status: String,
}

async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let orders = db::orders::list_all_with_user(state.pool()).await?;
    Ok(Json(json!({ "orders": orders })))
}

async fn get_order(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let order = db::orders::get_with_user(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(json!({ "order": order })))
}

/// Admins may set any status on any order.
async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<OrderStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    let status: OrderStatus = body
        .status
        .parse()
        .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

    let order = db::orders::update_status(state.pool(), id, status)
        .await
        .map_err(|e| match e {
            db::RepositoryError::NotFound => AppError::NotFound("Order not found".to_string()),
            other => AppError::Repository(other),
        })?;

    Ok(Json(json!({ "message": "Status updated", "order": order })))
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Deserialize)]
struct UpdateUserRequest {
    role: Option<String>,
    status: Option<String>,
}

async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let users = db::users::list(state.pool()).await?;
    Ok(Json(json!({ "users": users })))
}

async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>> {
    let role = body
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(|_| AppError::Validation("Invalid role".to_string()))?;
    let status = body
        .status
        .as_deref()
        .map(str::parse::<AccountStatus>)
        .transpose()
        .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

    let user = db::users::update_role_status(state.pool(), id, role, status)
        .await
        .map_err(|e| match e {
            db::RepositoryError::NotFound => AppError::NotFound("User not found".to_string()),
            other => AppError::Repository(other),
        })?;

    Ok(Json(json!({ "user": user })))
}

// =============================================================================
// Products
// =============================================================================

/// Every product, visibility rules and maintenance mode ignored.
async fn list_products(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let products = db::products::list_views(state.pool()).await?;
    Ok(Json(json!({ "products": products })))
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateCategoryRequest {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct UpdateCategoryRequest {
    name: Option<String>,
    status: Option<String>,
}

async fn list_categories(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let categories = db::categories::list(state.pool()).await?;
    Ok(Json(json!({ "categories": categories })))
}

async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let category = db::categories::create(state.pool(), name).await?;

    Ok((StatusCode::CREATED, Json(json!({ "category": category }))))
}

async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<serde_json::Value>> {
    let status = body
        .status
        .as_deref()
        .map(str::parse::<CategoryStatus>)
        .transpose()
        .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

    let name = body.name.as_deref().map(str::trim);
    if name == Some("") {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let category = db::categories::update(state.pool(), id, name, status)
        .await
        .map_err(|e| match e {
            db::RepositoryError::NotFound => {
                AppError::NotFound("Category not found".to_string())
            }
            other => AppError::Repository(other),
        })?;

    Ok(Json(json!({ "category": category })))
}

async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<serde_json::Value>> {
    db::categories::delete(state.pool(), id)
        .await
        .map_err(|e| match e {
            db::RepositoryError::NotFound => {
                AppError::NotFound("Category not found".to_string())
            }
            other => AppError::Repository(other),
        })?;

    Ok(Json(json!({ "message": "Category deleted" })))
}

// =============================================================================
// Settings
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSettingsRequest {
    store_name: Option<String>,
    support_email: Option<String>,
    support_phone: Option<String>,
    currency: Option<Currency>,
    maintenance_mode: Option<bool>,
    hide_inactive_category_products: Option<bool>,
    tax_rate: Option<Decimal>,
    shipping_fee: Option<Decimal>,
    cod_enabled: Option<bool>,
}

async fn get_settings(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let settings = db::settings::get(state.pool()).await?;
    Ok(Json(json!({ "settings": settings })))
}

async fn update_settings(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<serde_json::Value>> {
    if let Some(rate) = body.tax_rate
        && rate < Decimal::ZERO
    {
        return Err(AppError::Validation("taxRate must be >= 0".to_string()));
    }
    if let Some(fee) = body.shipping_fee
        && fee < Decimal::ZERO
    {
        return Err(AppError::Validation("shippingFee must be >= 0".to_string()));
    }

    let settings = db::settings::update(
        state.pool(),
        UpdateSettings {
            store_name: body.store_name,
            support_email: body.support_email,
            support_phone: body.support_phone,
            currency: body.currency,
            maintenance_mode: body.maintenance_mode,
            hide_inactive_category_products: body.hide_inactive_category_products,
            tax_rate: body.tax_rate,
            shipping_fee: body.shipping_fee,
            cod_enabled: body.cod_enabled,
        },
    )
    .await?;

    Ok(Json(json!({ "settings": settings })))
}
