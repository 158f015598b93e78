pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod services;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware::from_fn,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::create_api_router;
use crate::config::Config;
use crate::middleware::{auth::TokenKeys, logging::logging_middleware};
use crate::services::identity::PasswordPolicy;

/// Handles shared by every router.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub keys: Arc<TokenKeys>,
    pub passwords: Arc<PasswordPolicy>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self {
            db: Arc::new(db),
            keys: Arc::new(TokenKeys::new(&config.jwt_secret, config.token_ttl_hours)),
            passwords: Arc::new(PasswordPolicy::new(config.argon2_t_cost)),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    create_api_router(state)
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
