//! Database operations for products and reviews.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use novamart_core::{CategoryId, CategoryStatus, ProductId, Role, UserId};

use super::RepositoryError;
use crate::models::product::{CategoryRef, Product, ProductView, Review, SellerRef};

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, category_id, image, \
                               seller_id, rating, review_count, created_at, updated_at";

/// Populated product query: product joined with its seller and optional category.
const VIEW_QUERY: &str = r"
    SELECT p.id, p.name, p.description, p.price, p.stock, p.image,
           p.rating, p.review_count, p.created_at, p.updated_at,
           u.id AS seller_id, u.name AS seller_name, u.email AS seller_email,
           u.role AS seller_role,
           c.id AS category_id, c.name AS category_name, c.status AS category_status
    FROM products p
    JOIN users u ON u.id = p.seller_id
    LEFT JOIN categories c ON c.id = p.category_id
";

/// Fields for creating a product.
#[derive(Debug)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
    pub image: String,
    pub seller_id: UserId,
}

/// Fields for a partial product update. `None` leaves a field unchanged;
/// `category_id: Some(None)` clears the category.
#[derive(Debug, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category_id: Option<Option<CategoryId>>,
    pub image: Option<String>,
    pub seller_id: Option<UserId>,
}

/// List all products with seller and category populated, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_views(pool: &PgPool) -> Result<Vec<ProductView>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProductViewRow>(&format!(
        "{VIEW_QUERY} ORDER BY p.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ProductViewRow::into_view).collect())
}

/// Get one populated product by id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_view(
    pool: &PgPool,
    id: ProductId,
) -> Result<Option<ProductView>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductViewRow>(&format!("{VIEW_QUERY} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(ProductViewRow::into_view))
}

/// List a seller's own products, populated, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_views_by_seller(
    pool: &PgPool,
    seller_id: UserId,
) -> Result<Vec<ProductView>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProductViewRow>(&format!(
        "{VIEW_QUERY} WHERE p.seller_id = $1 ORDER BY p.created_at DESC"
    ))
    .bind(seller_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ProductViewRow::into_view).collect())
}

/// Get a product row by id (ownership checks, snapshots).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(pool: &PgPool, id: ProductId) -> Result<Option<Product>, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Ids of every product owned by a seller.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn ids_for_seller(
    pool: &PgPool,
    seller_id: UserId,
) -> Result<Vec<ProductId>, RepositoryError> {
    let ids: Vec<(ProductId,)> = sqlx::query_as("SELECT id FROM products WHERE seller_id = $1")
        .bind(seller_id)
        .fetch_all(pool)
        .await?;

    Ok(ids.into_iter().map(|(id,)| id).collect())
}

/// Create a product, returning its id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
#[instrument(skip(pool, params), fields(seller = %params.seller_id, name = %params.name))]
pub async fn create(pool: &PgPool, params: CreateProduct) -> Result<ProductId, RepositoryError> {
    let (id,): (ProductId,) = sqlx::query_as(
        r"
        INSERT INTO products (name, description, price, stock, category_id, image, seller_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        ",
    )
    .bind(&params.name)
    .bind(&params.description)
    .bind(params.price)
    .bind(params.stock)
    .bind(params.category_id)
    .bind(&params.image)
    .bind(params.seller_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Apply a partial update to a product.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product does not exist.
#[instrument(skip(pool, params))]
pub async fn update(
    pool: &PgPool,
    id: ProductId,
    params: UpdateProduct,
) -> Result<(), RepositoryError> {
    let (set_category, category_id) = match params.category_id {
        Some(value) => (true, value),
        None => (false, None),
    };

    let result = sqlx::query(
        r"
        UPDATE products
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            stock = COALESCE($5, stock),
            category_id = CASE WHEN $6 THEN $7 ELSE category_id END,
            image = COALESCE($8, image),
            seller_id = COALESCE($9, seller_id),
            updated_at = now()
        WHERE id = $1
        ",
    )
    .bind(id)
    .bind(params.name)
    .bind(params.description)
    .bind(params.price)
    .bind(params.stock)
    .bind(set_category)
    .bind(category_id)
    .bind(params.image)
    .bind(params.seller_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product does not exist.
#[instrument(skip(pool))]
pub async fn delete(pool: &PgPool, id: ProductId) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Add a review and recompute the product's aggregate rating and review
/// count, in one transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if this user already reviewed the
/// product.
#[instrument(skip(pool, comment))]
pub async fn add_review(
    pool: &PgPool,
    product_id: ProductId,
    user_id: UserId,
    reviewer_name: &str,
    rating: i32,
    comment: &str,
) -> Result<Review, RepositoryError> {
    let mut tx = pool.begin().await?;

    let review = sqlx::query_as::<_, Review>(
        r"
        INSERT INTO reviews (product_id, user_id, name, rating, comment)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, product_id, user_id, name, rating, comment, created_at
        ",
    )
    .bind(product_id)
    .bind(user_id)
    .bind(reviewer_name)
    .bind(rating)
    .bind(comment)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("You already reviewed this product".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    sqlx::query(
        r"
        UPDATE products
        SET rating = sub.avg_rating,
            review_count = sub.cnt,
            updated_at = now()
        FROM (
            SELECT AVG(rating)::numeric AS avg_rating, COUNT(*) AS cnt
            FROM reviews
            WHERE product_id = $1
        ) AS sub
        WHERE id = $1
        ",
    )
    .bind(product_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(review)
}

/// List reviews for a product, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_reviews(
    pool: &PgPool,
    product_id: ProductId,
) -> Result<Vec<Review>, RepositoryError> {
    let reviews = sqlx::query_as::<_, Review>(
        r"
        SELECT id, product_id, user_id, name, rating, comment, created_at
        FROM reviews
        WHERE product_id = $1
        ORDER BY created_at DESC
        ",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

#[derive(sqlx::FromRow)]
struct ProductViewRow {
    id: ProductId,
    name: String,
    description: String,
    price: Decimal,
    stock: i32,
    image: String,
    rating: Decimal,
    review_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    seller_id: UserId,
    seller_name: String,
    seller_email: String,
    seller_role: Role,
    category_id: Option<CategoryId>,
    category_name: Option<String>,
    category_status: Option<CategoryStatus>,
}

impl ProductViewRow {
    fn into_view(self) -> ProductView {
        let category = match (self.category_id, self.category_name, self.category_status) {
            (Some(id), Some(name), Some(status)) => Some(CategoryRef { id, name, status }),
            _ => None,
        };

        ProductView {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            image: self.image,
            rating: self.rating,
            review_count: self.review_count,
            seller: SellerRef {
                id: self.seller_id,
                name: self.seller_name,
                email: self.seller_email,
                role: self.seller_role,
            },
            category,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
