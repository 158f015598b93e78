use axum::{
    extract::Extension,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::api::ValidatedJson;
use crate::error::ServiceError;
use crate::middleware::auth::Claims;
use crate::services::cart::{self, CartContents, LineItem};
use crate::AppState;

//ROUTERS
pub fn cart_router(state: AppState) -> Router {
    Router::new()
        .route("/carts", post(add_to_cart))
        .route("/carts/me", get(get_cart))
        .route("/carts/cleanup", post(cleanup_cart))
        .route("/carts/items", delete(remove_item))
        .layer(Extension(state.db))
}

async fn add_to_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<AddToCart>,
) -> Result<impl IntoResponse, ServiceError> {
    let added = cart::add_item(&db, claims.user_id, payload.item_id, payload.quantity).await?;

    Ok(Json(json!({
        "message": "Item added to cart successfully",
        "cart_id": added.cart_id,
        "item": added.item,
    })))
}

async fn get_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ServiceError> {
    let contents = cart::get_cart(&*db, claims.user_id).await?;
    Ok(Json(CartView::from(contents)))
}

async fn cleanup_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ServiceError> {
    let lines = cart::cleanup(&db, claims.user_id).await?;

    Ok(Json(json!({
        "message": "Cart cleaned up successfully",
        "lines": lines.len(),
    })))
}

async fn remove_item(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<RemoveFromCart>,
) -> Result<impl IntoResponse, ServiceError> {
    cart::delete_item(&db, claims.user_id, payload.item_id).await?;

    Ok(Json(json!({
        "message": "Item removed from cart successfully"
    })))
}

//Structs
#[derive(Deserialize, Validate, Debug)]
struct AddToCart {
    #[validate(range(min = 1, message = "item_id is required"))]
    item_id: i32,
    #[validate(range(min = 1, max = 10000, message = "quantity must be between 1 and 10000"))]
    quantity: i32,
}

#[derive(Deserialize, Validate, Debug)]
struct RemoveFromCart {
    #[validate(range(min = 1, message = "item_id is required"))]
    item_id: i32,
}

/// Wire shape of a cart. A user without an active cart gets
/// `{"id": 0, "status": "empty", "items": []}`.
#[derive(Serialize)]
struct CartView {
    id: i32,
    status: String,
    items: Vec<LineItem>,
}

impl From<Option<CartContents>> for CartView {
    fn from(contents: Option<CartContents>) -> Self {
        match contents {
            Some(CartContents { cart, items }) => CartView {
                id: cart.id,
                status: cart.status.to_string(),
                items,
            },
            None => CartView {
                id: 0,
                status: "empty".to_owned(),
                items: Vec::new(),
            },
        }
    }
}
