use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::services::catalog;
use crate::AppState;

pub fn item_router(state: AppState) -> Router {
    Router::new()
        .route("/items", get(get_items))
        .route("/items/:id", get(get_item))
        .layer(Extension(state.db))
}

async fn get_items(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(catalog::list_items(&*db).await?))
}

async fn get_item(
    id: Result<Path<i32>, PathRejection>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<impl IntoResponse, ServiceError> {
    let Path(id) = id.map_err(|_| ServiceError::Validation("Invalid item ID".to_owned()))?;
    Ok(Json(catalog::get_item(&*db, id).await?))
}
