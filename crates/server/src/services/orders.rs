//! Order materialization and the status-change policy.
//!
//! # Materialization
//!
//! Checkout converts the user's cart into an immutable order: each line item
//! snapshots the product's current price, name, and image, and the total is
//! the sum of price × qty. When the server-side cart is empty the
//! client-submitted item list is used instead, so a frontend that tracks its
//! own cart still checks out; in that case a client-supplied total wins over
//! the computed one. The order insert and the cart clear commit in a single
//! transaction.
//!
//! # Status policy
//!
//! Who may move an order to which status is deliberately asymmetric and kept
//! in one place per actor rather than a shared transition function:
//!
//! - the owner may only cancel, and only while the order is still pending;
//! - a seller with at least one line item in the order may set any of the
//!   four statuses regardless of the current one;
//! - an admin may set any status on any order.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::instrument;

use novamart_core::{OrderStatus, ProductId, UserId};

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{CartItemView, Order, OrderItem, ShippingAddress};

/// A checkout line item submitted by the client (fallback path).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOrderItem {
    pub product_id: ProductId,
    /// Defaults to 1 when omitted.
    pub qty: Option<i32>,
}

/// Place an order for `user_id`.
///
/// # Errors
///
/// Returns `AppError::Validation` when the address has no full name, when
/// both the cart and the client payload are empty, or when a client-supplied
/// product does not exist.
#[instrument(skip(pool, address, client_items, client_total), fields(user = %user_id))]
pub async fn place_order(
    pool: &PgPool,
    user_id: UserId,
    address: ShippingAddress,
    client_items: Vec<ClientOrderItem>,
    client_total: Option<Decimal>,
) -> Result<Order> {
    if address.full_name.trim().is_empty() {
        return Err(AppError::Validation("Address is required".to_string()));
    }

    let cart_id = db::carts::get_or_create(pool, user_id).await?;
    let cart_items = db::carts::items(pool, cart_id).await?;

    if cart_items.is_empty() {
        // Fallback: materialize from the client payload
        if client_items.is_empty() {
            return Err(AppError::Validation("Cart is empty".to_string()));
        }

        let mut items = Vec::with_capacity(client_items.len());
        for client_item in client_items {
            let product = db::products::get(pool, client_item.product_id)
                .await?
                .ok_or_else(|| AppError::Validation("Product not found".to_string()))?;

            items.push(OrderItem {
                product_id: product.id,
                qty: client_item.qty.unwrap_or(1).max(1),
                price: product.price,
                name: product.name,
                image: product.image,
            });
        }

        let total = client_total.unwrap_or_else(|| order_total(&items));
        let order = db::orders::create(pool, user_id, &items, &address, total, None).await?;
        return Ok(order);
    }

    // Primary path: snapshot the cart and clear it in the same transaction
    let items = materialize_cart(&cart_items);
    let total = order_total(&items);
    let order =
        db::orders::create(pool, user_id, &items, &address, total, Some(cart_id)).await?;

    Ok(order)
}

/// Snapshot cart line items into order line items.
#[must_use]
pub fn materialize_cart(cart_items: &[CartItemView]) -> Vec<OrderItem> {
    cart_items
        .iter()
        .map(|ci| OrderItem {
            product_id: ci.product_id,
            qty: ci.qty,
            price: ci.price,
            name: ci.name.clone(),
            image: ci.image.clone(),
        })
        .collect()
}

/// Sum of price × qty over the given line items.
#[must_use]
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::subtotal).sum()
}

// =============================================================================
// Status-change policy
// =============================================================================

/// Owner-initiated cancel: requester must own the order and the order must
/// still be pending.
///
/// # Errors
///
/// Returns `AppError::Forbidden` for a non-owner and `AppError::Validation`
/// when the order is past pending.
pub fn authorize_owner_cancel(order: &Order, requester: UserId) -> Result<()> {
    if order.user_id != requester {
        return Err(AppError::Forbidden("Not allowed".to_string()));
    }
    if order.status != OrderStatus::Pending {
        return Err(AppError::Validation(
            "Only pending orders can be cancelled".to_string(),
        ));
    }
    Ok(())
}

/// Seller-initiated status update: requester must own at least one line
/// item's product. There is no restriction on the current status.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the order contains none of the
/// seller's products.
pub fn authorize_seller_update(order: &Order, seller_products: &HashSet<ProductId>) -> Result<()> {
    if order.contains_any_product(seller_products) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Not allowed for this order".to_string()))
    }
}

// Admin-initiated updates have no ownership or state check; there is nothing
// to authorize beyond the admin role itself, which the route extractor
// already proved.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cart_item(product_id: i32, qty: i32, price: Decimal) -> CartItemView {
        CartItemView {
            product_id: ProductId::new(product_id),
            qty,
            name: format!("Product {product_id}"),
            price,
            stock: 100,
            image: format!("/uploads/{product_id}.jpg"),
        }
    }

    fn order(owner: i32, status: OrderStatus, product_ids: &[i32]) -> Order {
        let items = product_ids
            .iter()
            .map(|&pid| OrderItem {
                product_id: ProductId::new(pid),
                qty: 1,
                price: Decimal::from(10),
                name: format!("Product {pid}"),
                image: String::new(),
            })
            .collect();
        Order {
            id: novamart_core::OrderId::new(1),
            user_id: UserId::new(owner),
            items,
            address: ShippingAddress::default(),
            total: Decimal::from(10),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_materialize_snapshots_cart_fields() {
        let items = materialize_cart(&[
            cart_item(1, 2, Decimal::from(100)),
            cart_item(2, 1, Decimal::from(50)),
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items.first().unwrap().name, "Product 1");
        assert_eq!(items.first().unwrap().price, Decimal::from(100));
        assert_eq!(items.first().unwrap().qty, 2);
    }

    #[test]
    fn test_order_total_sums_price_times_qty() {
        // Product A (price 100, qty 2) + product B (price 50, qty 1) = 250
        let items = materialize_cart(&[
            cart_item(1, 2, Decimal::from(100)),
            cart_item(2, 1, Decimal::from(50)),
        ]);
        assert_eq!(order_total(&items), Decimal::from(250));
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_owner_cancel_pending_ok() {
        let order = order(7, OrderStatus::Pending, &[1]);
        assert!(authorize_owner_cancel(&order, UserId::new(7)).is_ok());
    }

    #[test]
    fn test_owner_cancel_wrong_user_forbidden() {
        let order = order(7, OrderStatus::Pending, &[1]);
        assert!(matches!(
            authorize_owner_cancel(&order, UserId::new(8)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_owner_cancel_shipped_rejected() {
        let order = order(7, OrderStatus::Shipped, &[1]);
        let err = authorize_owner_cancel(&order, UserId::new(7)).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Only pending orders can be cancelled");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_owner_cancel_terminal_states_rejected() {
        for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let order = order(7, status, &[1]);
            assert!(authorize_owner_cancel(&order, UserId::new(7)).is_err());
        }
    }

    #[test]
    fn test_seller_update_requires_an_item() {
        let order = order(7, OrderStatus::Delivered, &[1, 2]);
        let owns: HashSet<ProductId> = [ProductId::new(2)].into_iter().collect();
        let owns_nothing: HashSet<ProductId> = [ProductId::new(9)].into_iter().collect();

        // Any current status is fine, including terminal ones
        assert!(authorize_seller_update(&order, &owns).is_ok());
        assert!(matches!(
            authorize_seller_update(&order, &owns_nothing),
            Err(AppError::Forbidden(_))
        ));
    }
}
