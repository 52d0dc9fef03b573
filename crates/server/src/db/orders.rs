//! Database operations for orders.
//!
//! Order creation and the cart clear run in a single transaction, so a crash
//! mid-sequence can neither duplicate an order nor leave a stale cart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use novamart_core::{CartId, OrderId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderWithUser, ShippingAddress};

const ORDER_COLUMNS: &str = "id, user_id, full_name, phone, street, city, state, pincode, \
                             total, status, created_at, updated_at";

/// Persist a new `pending` order and, when a cart id is given, empty that
/// cart in the same transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any write fails; nothing is
/// persisted in that case.
#[instrument(skip(pool, items, address), fields(user = %user_id, items = items.len()))]
pub async fn create(
    pool: &PgPool,
    user_id: UserId,
    items: &[OrderItem],
    address: &ShippingAddress,
    total: Decimal,
    clear_cart: Option<CartId>,
) -> Result<Order, RepositoryError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, OrderRow>(&format!(
        r"
        INSERT INTO orders (user_id, full_name, phone, street, city, state, pincode, total)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {ORDER_COLUMNS}
        "
    ))
    .bind(user_id)
    .bind(&address.full_name)
    .bind(&address.phone)
    .bind(&address.street)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.pincode)
    .bind(total)
    .fetch_one(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            r"
            INSERT INTO order_items (order_id, product_id, qty, price, name, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(row.id)
        .bind(item.product_id)
        .bind(item.qty)
        .bind(item.price)
        .bind(&item.name)
        .bind(&item.image)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(cart_id) = clear_cart {
        super::carts::clear(&mut *tx, cart_id).await?;
    }

    tx.commit().await?;

    Ok(row.into_order(items.to_vec()))
}

/// Get one order by id, with items.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(pool: &PgPool, id: OrderId) -> Result<Option<Order>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else { return Ok(None) };

    let items = items_for(pool, &[row.id]).await?.remove(&row.id).unwrap_or_default();

    Ok(Some(row.into_order(items)))
}

/// List a user's orders, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_user(pool: &PgPool, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    assemble(pool, rows).await
}

/// List every order that contains at least one of the given products,
/// newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_containing_products(
    pool: &PgPool,
    product_ids: &[ProductId],
) -> Result<Vec<Order>, RepositoryError> {
    let raw_ids: Vec<i32> = product_ids.iter().map(|id| id.as_i32()).collect();

    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        r"
        SELECT DISTINCT o.id, o.user_id, o.full_name, o.phone, o.street, o.city, o.state,
               o.pincode, o.total, o.status, o.created_at, o.updated_at
        FROM orders o
        JOIN order_items oi ON oi.order_id = o.id
        WHERE oi.product_id = ANY($1)
        ORDER BY o.created_at DESC
        "
    ))
    .bind(&raw_ids)
    .fetch_all(pool)
    .await?;

    assemble(pool, rows).await
}

/// List every order with the owning user's name and email, newest first
/// (admin surface).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_all_with_user(pool: &PgPool) -> Result<Vec<OrderWithUser>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderWithUserRow>(
        r"
        SELECT o.id, o.user_id, o.full_name, o.phone, o.street, o.city, o.state, o.pincode,
               o.total, o.status, o.created_at, o.updated_at,
               u.name AS user_name, u.email AS user_email
        FROM orders o
        JOIN users u ON u.id = o.user_id
        ORDER BY o.created_at DESC
        ",
    )
    .fetch_all(pool)
    .await?;

    let ids: Vec<OrderId> = rows.iter().map(|r| r.order.id).collect();
    let mut items = items_for(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            let order_items = items.remove(&r.order.id).unwrap_or_default();
            OrderWithUser {
                order: r.order.into_order(order_items),
                user_name: r.user_name,
                user_email: r.user_email,
            }
        })
        .collect())
}

/// Get one order with the owning user's name and email (admin surface).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_with_user(
    pool: &PgPool,
    id: OrderId,
) -> Result<Option<OrderWithUser>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderWithUserRow>(
        r"
        SELECT o.id, o.user_id, o.full_name, o.phone, o.street, o.city, o.state, o.pincode,
               o.total, o.status, o.created_at, o.updated_at,
               u.name AS user_name, u.email AS user_email
        FROM orders o
        JOIN users u ON u.id = o.user_id
        WHERE o.id = $1
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else { return Ok(None) };

    let items = items_for(pool, &[row.order.id])
        .await?
        .remove(&row.order.id)
        .unwrap_or_default();

    Ok(Some(OrderWithUser {
        order: row.order.into_order(items),
        user_name: row.user_name,
        user_email: row.user_email,
    }))
}

/// Set an order's status, returning the updated order.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order does not exist.
#[instrument(skip(pool))]
pub async fn update_status(
    pool: &PgPool,
    id: OrderId,
    status: OrderStatus,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        r"
        UPDATE orders
        SET status = $2, updated_at = now()
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    let items = items_for(pool, &[row.id]).await?.remove(&row.id).unwrap_or_default();

    Ok(row.into_order(items))
}

/// Count all orders (admin dashboard).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count(pool: &PgPool) -> Result<i64, RepositoryError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Sum of every order total (admin dashboard).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn total_revenue(pool: &PgPool) -> Result<Decimal, RepositoryError> {
    let (sum,): (Option<Decimal>,) = sqlx::query_as("SELECT SUM(total) FROM orders")
        .fetch_one(pool)
        .await?;

    Ok(sum.unwrap_or_default())
}

// =============================================================================
// Row assembly
// =============================================================================

async fn assemble(pool: &PgPool, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
    let ids: Vec<OrderId> = rows.iter().map(|r| r.id).collect();
    let mut items = items_for(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let order_items = items.remove(&row.id).unwrap_or_default();
            row.into_order(order_items)
        })
        .collect())
}

/// Load items for a set of orders, grouped by order id.
async fn items_for(
    pool: &PgPool,
    order_ids: &[OrderId],
) -> Result<HashMap<OrderId, Vec<OrderItem>>, RepositoryError> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let raw_ids: Vec<i32> = order_ids.iter().map(|id| id.as_i32()).collect();

    let rows = sqlx::query_as::<_, OrderItemRow>(
        r"
        SELECT order_id, product_id, qty, price, name, image
        FROM order_items
        WHERE order_id = ANY($1)
        ORDER BY id ASC
        ",
    )
    .bind(&raw_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(OrderItem {
            product_id: row.product_id,
            qty: row.qty,
            price: row.price,
            name: row.name,
            image: row.image,
        });
    }

    Ok(grouped)
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    full_name: String,
    phone: String,
    street: String,
    city: String,
    state: String,
    pincode: String,
    total: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            items,
            address: ShippingAddress {
                full_name: self.full_name,
                phone: self.phone,
                street: self.street,
                city: self.city,
                state: self.state,
                pincode: self.pincode,
            },
            total: self.total,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderWithUserRow {
    #[sqlx(flatten)]
    order: OrderRow,
    user_name: String,
    user_email: String,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    product_id: ProductId,
    qty: i32,
    price: Decimal,
    name: String,
    image: String,
}
