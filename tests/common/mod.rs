#![allow(dead_code)]

use reqwest::{header, Client, StatusCode};
use sea_orm::{ConnectOptions, Database};
use serde_json::json;

use shopcart::config::Config;
use shopcart::entities::{seed_catalog, setup_schema};
use shopcart::{create_app, AppState};

/// Serves a fresh app (in-memory store, seeded catalog) on an ephemeral
/// port and returns its base url.
pub async fn spawn_app() -> String {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    setup_schema(&db).await.expect("Failed to create schema");
    seed_catalog(&db).await.expect("Failed to seed catalog");

    let config = Config::from_lookup(|name| match name {
        "JWT_SECRET" => Some("test-secret".to_owned()),
        "ARGON2_T_COST" => Some("1".to_owned()),
        _ => None,
    })
    .expect("Failed to build config");

    let app = create_app(AppState::new(db, &config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{addr}")
}

/// Registers `username` and returns its session token.
pub async fn sign_up(client: &Client, base: &str, username: &str) -> String {
    let response = client
        .post(format!("{base}/users"))
        .json(&json!({
            "username": username,
            "password": "Muzion15"
        }))
        .send()
        .await
        .expect("Failed to send sign up request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse sign up response JSON");
    body["token"]
        .as_str()
        .expect("Token not found in sign up response")
        .to_owned()
}

pub fn bearer(token: &str) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token))
            .expect("Failed to create Authorization header"),
    );
    headers
}
