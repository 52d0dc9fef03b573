//! Integration tests for the admin surface and maintenance mode.
//!
//! These tests require a running server and database; see the crate docs.

use reqwest::StatusCode;
use serde_json::{Value, json};

use novamart_integration_tests::{base_url, client, register, unique_email};

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_admin_gate_rejects_shoppers() {
    let client = client();
    let (shopper_token, _) = register(&client, "user", &unique_email("shopper")).await;

    let resp = client
        .get(format!("{}/api/admin/stats", base_url()))
        .bearer_auth(&shopper_token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = resp.json().await.expect("bad body");
    assert_eq!(body["message"], "Admin access only");
}

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_maintenance_mode_blocks_public_browsing() {
    let client = client();
    let (admin_token, _) = register(&client, "admin", &unique_email("admin")).await;

    // Flip maintenance on
    let resp = client
        .put(format!("{}/api/admin/settings", base_url()))
        .bearer_auth(&admin_token)
        .json(&json!({ "maintenanceMode": true }))
        .send()
        .await
        .expect("settings update failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("products failed");
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = resp.json().await.expect("bad body");
    assert_eq!(
        body["message"],
        "Store is under maintenance. Please try again later."
    );

    // Flip it back so other tests can run
    let resp = client
        .put(format!("{}/api/admin/settings", base_url()))
        .bearer_auth(&admin_token)
        .json(&json!({ "maintenanceMode": false }))
        .send()
        .await
        .expect("settings update failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("products failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_blocked_account_loses_access() {
    let client = client();
    let (admin_token, _) = register(&client, "admin", &unique_email("admin")).await;
    let (shopper_token, shopper) = register(&client, "user", &unique_email("blockee")).await;
    let shopper_id = shopper["id"].as_i64().expect("user id missing");

    let resp = client
        .put(format!("{}/api/admin/users/{shopper_id}", base_url()))
        .bearer_auth(&admin_token)
        .json(&json!({ "status": "blocked" }))
        .send()
        .await
        .expect("block failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/users/me", base_url()))
        .bearer_auth(&shopper_token)
        .send()
        .await
        .expect("me failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("bad body");
    assert_eq!(body["message"], "Account blocked by admin");
}

#[tokio::test]
#[ignore = "Requires a running novamart server and database"]
async fn test_category_crud_and_duplicate_rejection() {
    let client = client();
    let (admin_token, _) = register(&client, "admin", &unique_email("admin")).await;

    let name = format!("Gadgets-{}", uuid::Uuid::new_v4());

    let resp = client
        .post(format!("{}/api/admin/categories", base_url()))
        .bearer_auth(&admin_token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("create failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("bad body");
    let category_id = body["category"]["id"].as_i64().expect("id missing");
    assert_eq!(body["category"]["status"], "active");

    // Duplicate names are rejected case-insensitively
    let resp = client
        .post(format!("{}/api/admin/categories", base_url()))
        .bearer_auth(&admin_token)
        .json(&json!({ "name": name.to_uppercase() }))
        .send()
        .await
        .expect("create failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("bad body");
    assert_eq!(body["message"], "Category already exists");

    let resp = client
        .delete(format!("{}/api/admin/categories/{category_id}", base_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("delete failed");
    assert_eq!(resp.status(), StatusCode::OK);
}
