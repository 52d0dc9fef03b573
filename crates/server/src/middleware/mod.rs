//! Request extractors for authentication and role gates.

mod auth;

pub use auth::{AuthUser, RequireAdmin, RequireSeller};
pub(crate) use auth::bearer_token_from_headers;
