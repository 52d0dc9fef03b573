//! Integration tests for Novamart.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p novamart-cli -- migrate
//!
//! # Start the server
//! cargo run -p novamart-server
//!
//! # Run integration tests (ignored by default)
//! cargo test -p novamart-integration-tests -- --ignored
//! ```
//!
//! Tests register throwaway accounts with unique emails, so they can run
//! repeatedly against the same database.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("NOVAMART_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Plain HTTP client; authentication is a bearer header per request.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email for one test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@novamart.test", Uuid::new_v4())
}

/// Register an account and return `(token, user)`.
///
/// # Panics
///
/// Panics if the registration request fails; tests want a loud failure.
pub async fn register(client: &Client, role: &str, email: &str) -> (String, Value) {
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": format!("Test {role}"),
            "email": email,
            "password": "integration-test-password",
            "role": role,
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), 201, "registration should succeed");

    let body: Value = resp.json().await.expect("Failed to parse register body");
    let token = body["token"].as_str().expect("token missing").to_string();
    (token, body["user"].clone())
}
