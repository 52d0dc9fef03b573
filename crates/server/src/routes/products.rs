//! Product catalog: public browsing, reviews, and seller management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::json;

use novamart_core::{CategoryId, CategoryStatus, ProductId, Role, UserId};

use crate::db;
use crate::db::products::{CreateProduct, UpdateProduct};
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, RequireSeller};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_public).post(create))
        .route("/mine", get(list_mine))
        .route("/{id}", get(get_public).put(update).delete(delete_product))
        .route("/{id}/reviews", get(list_reviews).post(add_review))
}

// =============================================================================
// Public surface
// =============================================================================

/// All publicly visible products, newest first.
async fn list_public(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let settings = super::guard_maintenance(&state).await?;

    let products: Vec<_> = db::products::list_views(state.pool())
        .await?
        .into_iter()
        .filter(|p| p.is_publicly_visible(settings.hide_inactive_category_products))
        .collect();

    Ok(Json(json!({ "products": products })))
}

/// One product, honoring the inactive-category visibility rule.
async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    let settings = super::guard_maintenance(&state).await?;

    let product = db::products::get_view(state.pool(), id)
        .await?
        .filter(|p| p.is_publicly_visible(settings.hide_inactive_category_products))
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "product": product })))
}

// =============================================================================
// Reviews
// =============================================================================

#[derive(Debug, Deserialize)]
struct ReviewRequest {
    rating: Option<i32>,
    #[serde(default)]
    comment: String,
}

async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    super::guard_maintenance(&state).await?;

    let reviews = db::products::list_reviews(state.pool(), id).await?;
    Ok(Json(json!({ "reviews": reviews })))
}

async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    AuthUser(user): AuthUser,
    Json(body): Json<ReviewRequest>,
) -> Result<impl IntoResponse> {
    let rating = body
        .rating
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| AppError::Validation("Rating must be between 1 and 5".to_string()))?;

    db::products::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let review = db::products::add_review(
        state.pool(),
        id,
        user.id,
        &user.name,
        rating,
        body.comment.trim(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "review": review }))))
}

// =============================================================================
// Seller management
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    price: Option<Decimal>,
    #[serde(default)]
    stock: i32,
    category_id: Option<CategoryId>,
    #[serde(default)]
    image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    stock: Option<i32>,
    /// Absent leaves the category unchanged; explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    category_id: Option<Option<CategoryId>>,
    image: Option<String>,
    /// Admin-only: reassign the product to a different seller.
    seller_id: Option<UserId>,
}

/// Distinguish an absent field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

async fn create(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Json(body): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    let price = validate_price(body.price)?;
    if body.stock < 0 {
        return Err(AppError::Validation("Stock must be >= 0".to_string()));
    }
    if let Some(category_id) = body.category_id {
        require_category(&state, category_id).await?;
    }

    let id = db::products::create(
        state.pool(),
        CreateProduct {
            name: body.name.trim().to_string(),
            description: body.description,
            price,
            stock: body.stock,
            category_id: body.category_id,
            image: body.image,
            seller_id: seller.id,
        },
    )
    .await?;

    let product = db::products::get_view(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::Internal("created product vanished".to_string()))?;

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

/// The seller's own products, newest first.
async fn list_mine(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
) -> Result<Json<serde_json::Value>> {
    let products = db::products::list_views_by_seller(state.pool(), seller.id).await?;
    Ok(Json(json!({ "products": products })))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    RequireSeller(seller): RequireSeller,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<serde_json::Value>> {
    require_ownership(&state, id, &seller).await?;

    if let Some(price) = body.price
        && price < Decimal::ZERO
    {
        return Err(AppError::Validation("Price must be >= 0".to_string()));
    }
    if let Some(stock) = body.stock
        && stock < 0
    {
        return Err(AppError::Validation("Stock must be >= 0".to_string()));
    }
    if let Some(Some(category_id)) = body.category_id {
        require_category(&state, category_id).await?;
    }
    if body.seller_id.is_some() && seller.role != Role::Admin {
        return Err(AppError::Forbidden("Not allowed".to_string()));
    }

    db::products::update(
        state.pool(),
        id,
        UpdateProduct {
            name: body.name,
            description: body.description,
            price: body.price,
            stock: body.stock,
            category_id: body.category_id,
            image: body.image,
            seller_id: body.seller_id,
        },
    )
    .await?;

    let product = db::products::get_view(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "product": product })))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    RequireSeller(seller): RequireSeller,
) -> Result<Json<serde_json::Value>> {
    require_ownership(&state, id, &seller).await?;
    db::products::delete(state.pool(), id).await?;

    Ok(Json(json!({ "message": "Product deleted" })))
}

fn validate_price(price: Option<Decimal>) -> Result<Decimal> {
    match price {
        Some(p) if p >= Decimal::ZERO => Ok(p),
        _ => Err(AppError::Validation("Price must be >= 0".to_string())),
    }
}

/// A product may only be filed under an existing, active category.
async fn require_category(state: &AppState, id: CategoryId) -> Result<()> {
    let category = db::categories::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::Validation("Category not found".to_string()))?;

    if category.status != CategoryStatus::Active {
        return Err(AppError::Validation("Category is inactive".to_string()));
    }

    Ok(())
}

/// Sellers may only touch their own products; admins may touch any.
async fn require_ownership(
    state: &AppState,
    id: ProductId,
    actor: &crate::models::User,
) -> Result<()> {
    let product = db::products::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if actor.role != Role::Admin && product.seller_id != actor.id {
        return Err(AppError::Forbidden("Not allowed".to_string()));
    }

    Ok(())
}
