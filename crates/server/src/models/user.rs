//! User accounts and bearer sessions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use novamart_core::{AccountStatus, Role, SessionId, UserId};

/// A marketplace account.
///
/// The password hash never leaves the repository layer; this struct is safe
/// to serialize into API responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Active or blocked.
    pub status: AccountStatus,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this account has been blocked by an admin.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.status == AccountStatus::Blocked
    }
}

/// A bearer token session.
///
/// Tokens are opaque random strings; the token value itself is the
/// credential, so sessions are never serialized into responses wholesale.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// Primary key.
    pub id: SessionId,
    /// Owning account.
    pub user_id: UserId,
    /// Opaque bearer token.
    pub token: String,
    /// Expiry instant; expired sessions are rejected and pruned.
    pub expires_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            id: SessionId::new(1),
            user_id: UserId::new(1),
            token: "tok".to_string(),
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        assert!(session(now - Duration::seconds(1)).is_expired(now));
        assert!(session(now).is_expired(now));
        assert!(!session(now + Duration::days(7)).is_expired(now));
    }
}
