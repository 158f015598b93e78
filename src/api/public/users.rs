use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::api::ValidatedJson;
use crate::error::ServiceError;
use crate::services::identity;
use crate::AppState;

pub fn users_router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(sign_up))
        .route("/users/login", post(login))
        .layer(Extension(state))
}

async fn sign_up(
    Extension(state): Extension<AppState>,
    ValidatedJson(payload): ValidatedJson<Credentials>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = identity::register(
        &*state.db,
        &state.passwords,
        &payload.username,
        &payload.password,
    )
    .await?;
    let token = state.keys.generate_token(user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": user.id,
            "username": user.username,
            "token": token,
        })),
    ))
}

async fn login(
    Extension(state): Extension<AppState>,
    ValidatedJson(payload): ValidatedJson<Credentials>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = identity::authenticate(&*state.db, &payload.username, &payload.password).await?;
    let token = state.keys.generate_token(user.id)?;

    Ok(Json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "username": user.username,
        },
    })))
}

#[derive(Deserialize, Validate)]
struct Credentials {
    #[validate(length(min = 1, message = "username is required"))]
    username: String,
    #[validate(length(min = 1, message = "password is required"))]
    password: String,
}
