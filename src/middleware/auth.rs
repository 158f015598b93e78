use crate::entities::user::Entity as UserEntity;
use crate::error::ServiceError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Resolves the bearer token to a user and stores its [`Claims`] in the
/// request extensions for the handlers behind this layer.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(ServiceError::Unauthorized("Authorization header is required"))?
        .to_str()
        .map_err(|_| ServiceError::Unauthorized("Invalid token"))?;
    let token = bearer_token(header)?;

    let claims = state.keys.validate(token)?;
    match UserEntity::find_by_id(claims.user_id).one(&*state.db).await? {
        Some(_) => {}
        None => return Err(ServiceError::Unauthorized("Invalid token")),
    }

    tracing::debug!(user_id = claims.user_id, "authenticated request");
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn bearer_token(header: &str) -> Result<&str, ServiceError> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(""), None) => Err(ServiceError::Unauthorized("Invalid token")),
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(ServiceError::Unauthorized(
            "Authorization header format must be Bearer {token}",
        )),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i32,
    pub exp: usize,
}

#[derive(Clone)]
pub struct AuthState {
    pub db: Arc<DatabaseConnection>,
    pub keys: Arc<TokenKeys>,
}

/// HS256 signing material plus the lifetime given to new tokens.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn generate_token(&self, user_id: i32) -> Result<String, ServiceError> {
        let exp = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| ServiceError::Token("expiry out of range".to_owned()))?
            .timestamp() as usize;

        encode(&Header::default(), &Claims { user_id, exp }, &self.encoding)
            .map_err(|err| ServiceError::Token(err.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized("Invalid token"))
    }
}
