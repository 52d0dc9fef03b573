//! Seller dashboard: incoming orders, status updates, and analytics.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use novamart_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::RequireSeller;
use crate::models::Order;
use crate::services::analytics::{compute_stats, monthly_revenue, seller_subtotal};
use crate::services::orders::authorize_seller_update;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_status))
        .route("/analytics", get(analytics))
        .route("/analytics/monthly", get(analytics_monthly))
}

/// An order as shown to a seller, with the subtotal of their own items.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SellerOrderView {
    #[serde(flatten)]
    order: Order,
    seller_total: Decimal,
}

/// Scope an order to one seller: drop other sellers' line items and compute
/// the subtotal over what remains.
fn seller_view(mut order: Order, seller_products: &HashSet<ProductId>) -> SellerOrderView {
    let seller_total = seller_subtotal(&order, seller_products);
    order
        .items
        .retain(|item| seller_products.contains(&item.product_id));

    SellerOrderView {
        order,
        seller_total,
    }
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    #[serde(default)]
    status: String,
}

async fn seller_product_set(state: &AppState, seller_id: UserId) -> Result<HashSet<ProductId>> {
    let ids = db::products::ids_for_seller(state.pool(), seller_id).await?;
    Ok(ids.into_iter().collect())
}

/// Every order containing at least one of the seller's products, newest
/// first, scoped to the seller's own line items.
async fn list_orders(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
) -> Result<Json<serde_json::Value>> {
    let products = seller_product_set(&state, seller.id).await?;
    let ids: Vec<ProductId> = products.iter().copied().collect();

    let orders: Vec<SellerOrderView> = db::orders::list_containing_products(state.pool(), &ids)
        .await?
        .into_iter()
        .map(|order| seller_view(order, &products))
        .collect();

    Ok(Json(json!({ "orders": orders })))
}

async fn get_order(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let order = db::orders::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let products = seller_product_set(&state, seller.id).await?;
    authorize_seller_update(&order, &products)?;

    Ok(Json(json!({ "order": seller_view(order, &products) })))
}

/// A seller may set any status on an order that contains their products.
async fn update_status(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<serde_json::Value>> {
    let status: OrderStatus = body
        .status
        .parse()
        .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

    let order = db::orders::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let products = seller_product_set(&state, seller.id).await?;
    authorize_seller_update(&order, &products)?;

    let order = db::orders::update_status(state.pool(), id, status).await?;

    Ok(Json(json!({ "message": "Status updated", "order": order })))
}

async fn analytics(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
) -> Result<Json<serde_json::Value>> {
    let products = seller_product_set(&state, seller.id).await?;
    let ids: Vec<ProductId> = products.iter().copied().collect();
    let orders = db::orders::list_containing_products(state.pool(), &ids).await?;

    Ok(Json(json!({ "stats": compute_stats(&orders, &products) })))
}

async fn analytics_monthly(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
) -> Result<Json<serde_json::Value>> {
    let products = seller_product_set(&state, seller.id).await?;
    let ids: Vec<ProductId> = products.iter().copied().collect();
    let orders = db::orders::list_containing_products(state.pool(), &ids).await?;

    Ok(Json(json!({ "series": monthly_revenue(&orders, &products) })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use novamart_core::OrderId;

    use crate::models::{OrderItem, ShippingAddress};

    fn item(product_id: i32, qty: i32, price: i64) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(product_id),
            qty,
            price: Decimal::from(price),
            name: format!("Product {product_id}"),
            image: String::new(),
        }
    }

    fn mixed_order() -> Order {
        let items = vec![item(1, 2, 100), item(9, 1, 1000)];
        let total = items.iter().map(OrderItem::subtotal).sum();
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            items,
            address: ShippingAddress::default(),
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_seller_view_hides_other_sellers_items() {
        let products: HashSet<ProductId> = [ProductId::new(1)].into_iter().collect();

        let view = seller_view(mixed_order(), &products);

        assert_eq!(view.order.items.len(), 1);
        assert_eq!(view.order.items[0].product_id, ProductId::new(1));
        assert_eq!(view.seller_total, Decimal::from(200));
        // The order total stays the shopper's full total
        assert_eq!(view.order.total, Decimal::from(1200));
    }

    #[test]
    fn test_seller_view_keeps_all_items_for_sole_seller() {
        let products: HashSet<ProductId> =
            [ProductId::new(1), ProductId::new(9)].into_iter().collect();

        let view = seller_view(mixed_order(), &products);

        assert_eq!(view.order.items.len(), 2);
        assert_eq!(view.seller_total, Decimal::from(1200));
    }
}
