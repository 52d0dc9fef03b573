//! Newtype wrappers and closed enums for the marketplace domain.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{CartId, CategoryId, OrderId, ProductId, ReviewId, SessionId, UserId};
pub use role::{AccountStatus, Role};
pub use status::{CategoryStatus, Currency, OrderStatus};
