//! Business logic over the repositories.
//!
//! Handlers stay thin; validation, authorization policy, and multi-step
//! persistence live here.

pub mod analytics;
pub mod auth;
pub mod orders;
