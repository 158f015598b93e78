use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr};

use crate::entities::user::{self, Entity as UserEntity};
use crate::error::ServiceError;

// verification reads params from the stored hash, so t_cost can change freely
#[derive(Clone, Debug)]
pub struct PasswordPolicy {
    t_cost: u32,
}

impl PasswordPolicy {
    pub fn new(t_cost: u32) -> Self {
        Self { t_cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            self.t_cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|err| ServiceError::PasswordHash(err.to_string()))?;
        let salt = SaltString::generate(&mut OsRng);

        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ServiceError::PasswordHash(err.to_string()))
    }
}

pub async fn register<C: ConnectionTrait>(
    db: &C,
    passwords: &PasswordPolicy,
    username: &str,
    password: &str,
) -> Result<user::Model, ServiceError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ServiceError::Validation(
            "username and password are required".to_owned(),
        ));
    }

    let new_user = user::ActiveModel {
        username: Set(username.to_owned()),
        password: Set(passwords.hash(password)?),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_user.insert(db).await {
        Ok(model) => {
            tracing::info!(user_id = model.id, "registered user");
            Ok(model)
        }
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Err(ServiceError::UsernameTaken(username.to_owned()))
            }
            _ => Err(err.into()),
        },
    }
}

pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<user::Model, ServiceError> {
    let user = UserEntity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or(ServiceError::InvalidCredentials)?;

    if user.check_hash(password) {
        Ok(user)
    } else {
        Err(ServiceError::InvalidCredentials)
    }
}
