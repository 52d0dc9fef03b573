//! Shopping carts.
//!
//! One cart per user, created lazily on first access. Line items are unique
//! per product; adding an existing product merges quantities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use novamart_core::{CartId, ProductId, UserId};

/// A cart line item with its product populated, as served to clients.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    /// Referenced product.
    pub product_id: ProductId,
    /// Quantity, at least 1.
    pub qty: i32,
    /// Live product name.
    pub name: String,
    /// Live product price.
    pub price: Decimal,
    /// Live units in stock.
    pub stock: i32,
    /// Live product image.
    pub image: String,
}

/// A user's cart with populated line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Primary key.
    pub id: CartId,
    /// Owning account.
    pub user_id: UserId,
    /// Populated line items.
    pub items: Vec<CartItemView>,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last touched.
    pub updated_at: DateTime<Utc>,
}
