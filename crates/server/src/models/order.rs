//! Orders and their immutable line-item snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use novamart_core::{OrderId, OrderStatus, ProductId, UserId};

/// Shipping address captured at checkout.
///
/// Only `full_name` is validated server-side; the remaining fields are
/// stored as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient name; the one required field.
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

/// An order line item.
///
/// Price, name, and image are snapshots taken at order creation. They are
/// never re-derived from the live product, so later product edits do not
/// rewrite order history.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Referenced product.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub qty: i32,
    /// Price at purchase time.
    pub price: Decimal,
    /// Product name at purchase time.
    pub name: String,
    /// Product image at purchase time.
    pub image: String,
}

impl OrderItem {
    /// Line subtotal: price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Primary key.
    pub id: OrderId,
    /// Owning account.
    pub user_id: UserId,
    /// Immutable line-item snapshots.
    pub items: Vec<OrderItem>,
    /// Shipping address captured at checkout.
    pub address: ShippingAddress,
    /// Order total.
    pub total: Decimal,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether any line item references one of the given products.
    #[must_use]
    pub fn contains_any_product(&self, product_ids: &std::collections::HashSet<ProductId>) -> bool {
        self.items.iter().any(|it| product_ids.contains(&it.product_id))
    }
}

/// An order joined with its owner's name and email (admin listings).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithUser {
    #[serde(flatten)]
    pub order: Order,
    /// Owner display name.
    pub user_name: String,
    /// Owner email.
    pub user_email: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_subtotal() {
        let item = OrderItem {
            product_id: ProductId::new(1),
            qty: 3,
            price: Decimal::new(9950, 2), // 99.50
            name: "Widget".to_string(),
            image: String::new(),
        };
        assert_eq!(item.subtotal(), Decimal::new(29850, 2)); // 298.50
    }
}
