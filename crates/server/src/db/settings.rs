//! Database operations for the store settings singleton.
//!
//! The row is created by the initial migration with `id = 1` and a
//! `CHECK (id = 1)` constraint, so reads never have to create it and two
//! racing first-reads cannot produce duplicates.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use novamart_core::Currency;

use super::RepositoryError;
use crate::models::StoreSettings;

const SETTINGS_COLUMNS: &str = "store_name, support_email, support_phone, currency, \
                                maintenance_mode, hide_inactive_category_products, \
                                tax_rate, shipping_fee, cod_enabled, updated_at";

/// Fields for a partial settings update. `None` leaves a field unchanged.
#[derive(Debug, Default)]
pub struct UpdateSettings {
    pub store_name: Option<String>,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
    pub currency: Option<Currency>,
    pub maintenance_mode: Option<bool>,
    pub hide_inactive_category_products: Option<bool>,
    pub tax_rate: Option<Decimal>,
    pub shipping_fee: Option<Decimal>,
    pub cod_enabled: Option<bool>,
}

/// Load the settings singleton.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the seeded row is missing
/// (the migration was not run).
pub async fn get(pool: &PgPool) -> Result<StoreSettings, RepositoryError> {
    sqlx::query_as::<_, StoreSettings>(&format!(
        "SELECT {SETTINGS_COLUMNS} FROM store_settings WHERE id = 1"
    ))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        RepositoryError::DataCorruption("store_settings row missing; run migrations".to_owned())
    })
}

/// Apply a partial update to the settings singleton and return the result.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the seeded row is missing.
#[instrument(skip(pool, params))]
pub async fn update(
    pool: &PgPool,
    params: UpdateSettings,
) -> Result<StoreSettings, RepositoryError> {
    sqlx::query_as::<_, StoreSettings>(&format!(
        r"
        UPDATE store_settings
        SET store_name = COALESCE($1, store_name),
            support_email = COALESCE($2, support_email),
            support_phone = COALESCE($3, support_phone),
            currency = COALESCE($4, currency),
            maintenance_mode = COALESCE($5, maintenance_mode),
            hide_inactive_category_products = COALESCE($6, hide_inactive_category_products),
            tax_rate = COALESCE($7, tax_rate),
            shipping_fee = COALESCE($8, shipping_fee),
            cod_enabled = COALESCE($9, cod_enabled),
            updated_at = now()
        WHERE id = 1
        RETURNING {SETTINGS_COLUMNS}
        "
    ))
    .bind(params.store_name)
    .bind(params.support_email)
    .bind(params.support_phone)
    .bind(params.currency)
    .bind(params.maintenance_mode)
    .bind(params.hide_inactive_category_products)
    .bind(params.tax_rate)
    .bind(params.shipping_fee)
    .bind(params.cod_enabled)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        RepositoryError::DataCorruption("store_settings row missing; run migrations".to_owned())
    })
}
