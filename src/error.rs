use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

use crate::middleware::logging::FailedRequest;

/// Every outcome a service or the auth gate can refuse a request with.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Item {0} not found")]
    ItemNotFound(i32),
    #[error("No active cart found")]
    NoActiveCart,
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Cart {0} has already been ordered")]
    CartFrozen(i32),
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),
    #[error("Quantity of item {0} is too large")]
    QuantityOverflow(i32),
    #[error("Username {0:?} is already taken")]
    UsernameTaken(String),
    #[error("{0}")]
    Validation(String),
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
    #[error("Failed to issue token: {0}")]
    Token(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::ItemNotFound(_) | Self::NoActiveCart => StatusCode::NOT_FOUND,
            Self::EmptyCart
            | Self::InvalidQuantity(_)
            | Self::QuantityOverflow(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UsernameTaken(_) | Self::CartFrozen(_) => StatusCode::CONFLICT,
            Self::PasswordHash(_) | Self::Token(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        // internals go to the log, not to the client
        let message = if status.is_server_error() {
            "Internal server error".to_owned()
        } else {
            detail.clone()
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        response.extensions_mut().insert(FailedRequest(detail));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(
            ServiceError::Unauthorized("Invalid token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ServiceError::ItemNotFound(9).status(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::NoActiveCart.status(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::EmptyCart.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::InvalidQuantity(0).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::QuantityOverflow(3).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServiceError::UsernameTaken("ann".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Database(DbErr::Custom("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_details_but_keep_them_for_logging() {
        let response = ServiceError::Database(DbErr::Custom("disk on fire".into())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let logged = response.extensions().get::<FailedRequest>().unwrap();
        assert!(logged.0.contains("disk on fire"));
    }
}
