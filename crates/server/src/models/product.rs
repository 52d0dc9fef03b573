//! Products and their reviews.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use novamart_core::{CategoryId, CategoryStatus, ProductId, ReviewId, Role, UserId};

/// A product row as stored.
///
/// Price and stock are non-negative (enforced by database checks and by
/// validation at the API boundary). The seller reference is set at creation
/// and only ever reassigned through the admin surface.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Primary key.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Units in stock, non-negative.
    pub stock: i32,
    /// Optional category reference.
    pub category_id: Option<CategoryId>,
    /// Image path or URL (upload handling is external).
    pub image: String,
    /// Owning seller account.
    pub seller_id: UserId,
    /// Aggregate review rating.
    pub rating: Decimal,
    /// Number of reviews.
    pub review_count: i32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Seller fields embedded in a populated product response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRef {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Category fields embedded in a populated product response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub status: CategoryStatus,
}

/// A product with its seller and category populated, as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub image: String,
    pub rating: Decimal,
    pub review_count: i32,
    pub seller: SellerRef,
    pub category: Option<CategoryRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductView {
    /// Whether this product may be shown to shoppers.
    ///
    /// A product is visible when it has no category, when its category is
    /// active, or when the store has chosen not to hide inactive-category
    /// products.
    #[must_use]
    pub fn is_publicly_visible(&self, hide_inactive_category_products: bool) -> bool {
        if !hide_inactive_category_products {
            return true;
        }
        self.category
            .as_ref()
            .is_none_or(|c| c.status == CategoryStatus::Active)
    }
}

/// A shopper review on a product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Primary key.
    pub id: ReviewId,
    /// Reviewed product.
    pub product_id: ProductId,
    /// Reviewing account; one review per account per product.
    pub user_id: UserId,
    /// Reviewer display name, snapshotted at review time.
    pub name: String,
    /// Rating between 1 and 5.
    pub rating: i32,
    /// Free-form comment.
    pub comment: String,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn view(category: Option<CategoryRef>) -> ProductView {
        ProductView {
            id: ProductId::new(1),
            name: "Widget".to_string(),
            description: String::new(),
            price: Decimal::from(100),
            stock: 5,
            image: String::new(),
            rating: Decimal::ZERO,
            review_count: 0,
            seller: SellerRef {
                id: UserId::new(2),
                name: "Seller".to_string(),
                email: "seller@example.com".to_string(),
                role: Role::Seller,
            },
            category,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn category(status: CategoryStatus) -> CategoryRef {
        CategoryRef {
            id: CategoryId::new(1),
            name: "Gadgets".to_string(),
            status,
        }
    }

    #[test]
    fn test_uncategorized_product_is_visible() {
        assert!(view(None).is_publicly_visible(true));
    }

    #[test]
    fn test_active_category_product_is_visible() {
        assert!(view(Some(category(CategoryStatus::Active))).is_publicly_visible(true));
    }

    #[test]
    fn test_inactive_category_product_is_hidden() {
        assert!(!view(Some(category(CategoryStatus::Inactive))).is_publicly_visible(true));
    }

    #[test]
    fn test_hiding_disabled_shows_everything() {
        assert!(view(Some(category(CategoryStatus::Inactive))).is_publicly_visible(false));
    }
}
