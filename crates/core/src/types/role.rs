//! Account roles and account status.
//!
//! Roles are a closed enum with exhaustive matching everywhere they are
//! consulted, so a typo in a role name is a compile error rather than a
//! silently-failing authorization check.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role attached to an account.
///
/// - `User` - public shopper: browses, carts, places and cancels own orders
/// - `Seller` - manages their own catalog, fulfils orders containing their items
/// - `Admin` - unrestricted management surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "account_role", rename_all = "lowercase"))]
pub enum Role {
    #[default]
    User,
    Seller,
    Admin,
}

impl Role {
    /// String form used in API payloads and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Whether an account may use the API at all.
///
/// Blocked accounts are rejected during authentication, before any handler
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "account_status", rename_all = "lowercase")
)]
pub enum AccountStatus {
    #[default]
    Active,
    Blocked,
}

impl AccountStatus {
    /// String form used in API payloads and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "blocked" => Ok(Self::Blocked),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
