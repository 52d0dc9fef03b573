//! Domain models backing the REST surface.
//!
//! All API-facing structs serialize with camelCase field names, matching the
//! JSON contract the frontend consumes.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod settings;
pub mod user;

pub use cart::{CartItemView, CartView};
pub use category::Category;
pub use order::{Order, OrderItem, OrderWithUser, ShippingAddress};
pub use product::{Product, ProductView, Review};
pub use settings::StoreSettings;
pub use user::{Session, User};
