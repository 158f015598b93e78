use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};

use crate::entities::item::{self, Entity as ItemEntity};
use crate::error::ServiceError;

pub async fn list_items<C: ConnectionTrait>(db: &C) -> Result<Vec<item::Model>, ServiceError> {
    Ok(ItemEntity::find()
        .order_by_asc(item::Column::Id)
        .all(db)
        .await?)
}

pub async fn get_item<C: ConnectionTrait>(db: &C, id: i32) -> Result<item::Model, ServiceError> {
    ItemEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::ItemNotFound(id))
}
