//! Database operations for shopping carts.
//!
//! One cart per user, created lazily on first access. Line items are unique
//! per (cart, product); adding an existing product merges quantities
//! atomically via an upsert, so two racing adds cannot drop an increment.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use novamart_core::{CartId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartItemView, CartView};

/// Get the user's cart, creating an empty one if none exists.
///
/// Idempotent; the only side effect happens on first call.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[instrument(skip(pool))]
pub async fn get_or_create(pool: &PgPool, user_id: UserId) -> Result<CartId, RepositoryError> {
    let (id,): (CartId,) = sqlx::query_as(
        r"
        INSERT INTO carts (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING id
        ",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Load a cart with its line items populated from the live products.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the cart does not exist.
pub async fn view(pool: &PgPool, cart_id: CartId) -> Result<CartView, RepositoryError> {
    let (user_id, created_at, updated_at): (UserId, DateTime<Utc>, DateTime<Utc>) =
        sqlx::query_as("SELECT user_id, created_at, updated_at FROM carts WHERE id = $1")
            .bind(cart_id)
            .fetch_optional(pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

    let items = items(pool, cart_id).await?;

    Ok(CartView {
        id: cart_id,
        user_id,
        items,
        created_at,
        updated_at,
    })
}

/// Load a cart's line items populated from the live products.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn items(pool: &PgPool, cart_id: CartId) -> Result<Vec<CartItemView>, RepositoryError> {
    let items = sqlx::query_as::<_, CartItemView>(
        r"
        SELECT ci.product_id, ci.qty, p.name, p.price, p.stock, p.image
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.cart_id = $1
        ORDER BY ci.id ASC
        ",
    )
    .bind(cart_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Add a product to the cart, merging quantities when a line item for the
/// product already exists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the upsert fails (including a
/// foreign key violation for a missing product; callers validate the
/// product first for a clean error message).
#[instrument(skip(pool))]
pub async fn add_item(
    pool: &PgPool,
    cart_id: CartId,
    product_id: ProductId,
    qty: i32,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO cart_items (cart_id, product_id, qty)
        VALUES ($1, $2, $3)
        ON CONFLICT (cart_id, product_id)
        DO UPDATE SET qty = cart_items.qty + EXCLUDED.qty
        ",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(qty)
    .execute(pool)
    .await?;

    touch(pool, cart_id).await
}

/// Replace the quantity of an existing line item.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no line item for the product
/// exists in this cart.
#[instrument(skip(pool))]
pub async fn set_item_qty(
    pool: &PgPool,
    cart_id: CartId,
    product_id: ProductId,
    qty: i32,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        "UPDATE cart_items SET qty = $3 WHERE cart_id = $1 AND product_id = $2",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(qty)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    touch(pool, cart_id).await
}

/// Remove a line item. Removing an absent product is a no-op, not an error.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
#[instrument(skip(pool))]
pub async fn remove_item(
    pool: &PgPool,
    cart_id: CartId,
    product_id: ProductId,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
        .bind(cart_id)
        .bind(product_id)
        .execute(pool)
        .await?;

    touch(pool, cart_id).await
}

/// Empty the cart. Runs on the given executor so order placement can clear
/// the cart inside its transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn clear<'e, E>(executor: E, cart_id: CartId) -> Result<(), RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Bump the cart's `updated_at`.
async fn touch(pool: &PgPool, cart_id: CartId) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
        .bind(cart_id)
        .execute(pool)
        .await?;

    Ok(())
}
