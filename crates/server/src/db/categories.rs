//! Database operations for product categories.

use sqlx::PgPool;
use tracing::instrument;

use novamart_core::{CategoryId, CategoryStatus};

use super::RepositoryError;
use crate::models::Category;

const CATEGORY_COLUMNS: &str = "id, name, status, created_at, updated_at";

/// List every category, newest first (admin surface).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<Category>, RepositoryError> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// List active categories sorted by name (public surface).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_active(pool: &PgPool) -> Result<Vec<Category>, RepositoryError> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE status = 'active' ORDER BY name ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Get a category by id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(pool: &PgPool, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Create a new category.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if a category with the same name
/// (case-insensitively) already exists.
#[instrument(skip(pool))]
pub async fn create(pool: &PgPool, name: &str) -> Result<Category, RepositoryError> {
    let category = sqlx::query_as::<_, Category>(
        r"
        INSERT INTO categories (name)
        VALUES ($1)
        RETURNING id, name, status, created_at, updated_at
        ",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("Category already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Ok(category)
}

/// Update a category's name and/or status. Unspecified fields are left
/// unchanged.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the category does not exist and
/// `RepositoryError::Conflict` on a duplicate name.
#[instrument(skip(pool))]
pub async fn update(
    pool: &PgPool,
    id: CategoryId,
    name: Option<&str>,
    status: Option<CategoryStatus>,
) -> Result<Category, RepositoryError> {
    let category = sqlx::query_as::<_, Category>(
        r"
        UPDATE categories
        SET name = COALESCE($2, name),
            status = COALESCE($3, status),
            updated_at = now()
        WHERE id = $1
        RETURNING id, name, status, created_at, updated_at
        ",
    )
    .bind(id)
    .bind(name)
    .bind(status)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("Category already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?
    .ok_or(RepositoryError::NotFound)?;

    Ok(category)
}

/// Delete a category.
///
/// Products referencing it fall back to "no category" (`ON DELETE SET NULL`).
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the category does not exist.
#[instrument(skip(pool))]
pub async fn delete(pool: &PgPool, id: CategoryId) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
