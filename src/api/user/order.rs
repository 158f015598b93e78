use axum::{
    extract::Extension,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::middleware::auth::Claims;
use crate::services::order;
use crate::AppState;

pub fn order_router(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/me", get(get_orders))
        .layer(Extension(state.db))
}

async fn create_order(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ServiceError> {
    let placed = order::place_order(&db, claims.user_id).await?;

    Ok(Json(json!({
        "order_id": placed.order_id,
        "items": placed.items,
        "status": "success",
        "message": "Order created successfully",
    })))
}

async fn get_orders(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(order::list_orders(&*db, claims.user_id).await?))
}
