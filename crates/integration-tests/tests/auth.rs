//! Integration tests for registration, login, and token handling.
//!
//! These tests require a running server and database; see the crate docs.

use reqwest::StatusCode;
use serde_json::{Value, json};

use novamart_integration_tests::{base_url, client, register, unique_email};

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_register_login_me_roundtrip() {
    let client = client();
    let email = unique_email("shopper");

    let (token, user) = register(&client, "user", &email).await;
    assert_eq!(user["email"], email);
    assert_eq!(user["role"], "user");
    assert_eq!(user["status"], "active");

    // Login with the same credentials
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "integration-test-password" }))
        .send()
        .await
        .expect("login failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Token resolves to the same user
    let resp = client
        .get(format!("{}/api/users/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("me failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("bad me body");
    assert_eq!(body["user"]["email"], email);
}

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_duplicate_registration_rejected() {
    let client = client();
    let email = unique_email("dupe");

    register(&client, "user", &email).await;

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": "Dupe",
            "email": email,
            "password": "integration-test-password",
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("bad body");
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_wrong_password_rejected() {
    let client = client();
    let email = unique_email("wrongpw");
    register(&client, "user", &email).await;

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_logout_revokes_token() {
    let client = client();
    let (token, _) = register(&client, "user", &unique_email("logout")).await;

    let resp = client
        .post(format!("{}/api/auth/logout", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("logout failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/users/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("me failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_missing_token_is_401() {
    let client = client();

    let resp = client
        .get(format!("{}/api/orders/my", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("bad body");
    assert_eq!(body["message"], "No token");
}
