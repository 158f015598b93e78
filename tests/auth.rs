mod common;

use reqwest::{header, Client, StatusCode};
use serde_json::json;

use common::{bearer, sign_up, spawn_app};

#[tokio::test]
async fn test_health_check() {
    let base = spawn_app().await;

    let response = Client::new()
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success(), "Health check failed");
}

#[tokio::test]
async fn test_create_user() {
    let base = spawn_app().await;

    let response = Client::new()
        .post(format!("{base}/users"))
        .json(&json!({
            "username": "JohnDoe",
            "password": "Muzion15"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["username"], "JohnDoe");
    assert!(body["id"].as_i64().is_some());
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn test_duplicate_user() {
    let base = spawn_app().await;
    let client = Client::new();
    sign_up(&client, &base, "JohnDoe").await;

    let response = client
        .post(format!("{base}/users"))
        .json(&json!({
            "username": "JohnDoe",
            "password": "other"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_missing_credentials() {
    let base = spawn_app().await;

    let response = Client::new()
        .post(format!("{base}/users"))
        .json(&json!({ "username": "JohnDoe" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_login() {
    let base = spawn_app().await;
    let client = Client::new();
    sign_up(&client, &base, "JohnDoe").await;

    let response = client
        .post(format!("{base}/users/login"))
        .json(&json!({
            "username": "JohnDoe",
            "password": "Muzion15"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["user"]["username"], "JohnDoe");

    let token = body["token"].as_str().expect("Token not found in login response");
    let response = client
        .get(format!("{base}/carts/me"))
        .headers(bearer(token))
        .send()
        .await
        .expect("Failed to send request to protected url");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let base = spawn_app().await;
    let client = Client::new();
    sign_up(&client, &base, "JohnDoe").await;

    let response = client
        .post(format!("{base}/users/login"))
        .json(&json!({
            "username": "JohnDoe",
            "password": "nope"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let base = spawn_app().await;
    let client = Client::new();

    let missing = client
        .get(format!("{base}/carts/me"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let body = missing
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["error"], "Authorization header is required");

    let malformed = client
        .get(format!("{base}/orders/me"))
        .header(header::AUTHORIZATION, "Token abc")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);

    let forged = client
        .get(format!("{base}/orders/me"))
        .headers(bearer("sample-token"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    let body = forged
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["error"], "Invalid token");
}
