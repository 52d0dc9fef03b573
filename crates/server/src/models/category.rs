//! Product categories.

use chrono::{DateTime, Utc};
use serde::Serialize;

use novamart_core::{CategoryId, CategoryStatus};

/// A product category.
///
/// Names are unique case-insensitively. Products referencing an inactive
/// category disappear from the public catalog when the store is configured
/// to hide them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Primary key.
    pub id: CategoryId,
    /// Unique (case-insensitive) display name.
    pub name: String,
    /// Active or inactive.
    pub status: CategoryStatus,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}
