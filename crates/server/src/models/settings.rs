//! Global store settings.
//!
//! A single row (`id = 1`, enforced by a database check) seeded by the
//! initial migration, so the settings always exist and a racing
//! find-or-create can never produce duplicates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use novamart_core::Currency;

/// The store-wide settings singleton.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    /// Public store name.
    pub store_name: String,
    /// Support contact email.
    pub support_email: String,
    /// Support contact phone.
    pub support_phone: String,
    /// Store display currency.
    pub currency: Currency,
    /// When set, public browsing returns 503.
    pub maintenance_mode: bool,
    /// When set, products in inactive categories are hidden from shoppers.
    pub hide_inactive_category_products: bool,
    /// Tax rate in percent applied at display time.
    pub tax_rate: Decimal,
    /// Flat shipping fee.
    pub shipping_fee: Decimal,
    /// Whether cash-on-delivery is offered.
    pub cod_enabled: bool,
    /// When the settings were last updated.
    pub updated_at: DateTime<Utc>,
}
