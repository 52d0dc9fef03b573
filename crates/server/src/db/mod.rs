//! Database operations for the marketplace `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `users` - Accounts with role and active/blocked status
//! - `sessions` - Opaque bearer tokens
//! - `categories` - Product categories (case-insensitively unique names)
//! - `products` - Seller-owned catalog entries
//! - `reviews` - One review per user per product
//! - `carts` / `cart_items` - One cart per user, one line item per product
//! - `orders` / `order_items` - Orders with immutable line-item snapshots
//! - `store_settings` - Singleton settings row (`id = 1`), seeded by migration
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p novamart-cli -- migrate
//! ```
//!
//! All queries use the runtime `sqlx::query`/`query_as` API with explicit
//! binds, so the crate builds without a live database.

pub mod carts;
pub mod categories;
pub mod orders;
pub mod products;
pub mod sessions;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate email or category name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
