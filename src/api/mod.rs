pub mod public;
pub mod user;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json, Router,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ServiceError;
use crate::AppState;
use public::public_api_router;
use user::user_api_router;

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .merge(public_api_router(state.clone()))
        .merge(user_api_router(state))
}

/// JSON body that has passed its `validator` rules. Malformed bodies and
/// failed rules both become a 400 with the usual error body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
