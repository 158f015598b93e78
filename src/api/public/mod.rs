pub mod item;
pub mod users;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;
use item::item_router;
use users::users_router;

pub fn public_api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(users_router(state.clone()))
        .merge(item_router(state))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
