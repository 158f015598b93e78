use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;

use crate::entities::{
    cart::{self, CartStatus, Entity as CartEntity},
    cart_item::{self, Entity as CartItemEntity},
    item::{self, Entity as ItemEntity},
};
use crate::error::ServiceError;
use crate::services::catalog;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub item: item::Model,
    pub quantity: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CartContents {
    pub cart: cart::Model,
    pub items: Vec<LineItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AddedItem {
    pub cart_id: i32,
    pub item: item::Model,
}

pub(crate) async fn find_active_cart<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<cart::Model>, DbErr> {
    CartEntity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .filter(cart::Column::Status.eq(CartStatus::Active))
        .one(db)
        .await
}

pub async fn get_or_create_active_cart<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<cart::Model, ServiceError> {
    match find_active_cart(db, user_id).await? {
        Some(cart) => Ok(cart),
        None => create_active_cart(db, user_id).await,
    }
}

/// Inserts a new active cart. Losing the insert to another request is not
/// an error: the winner's cart is returned instead.
pub(crate) async fn create_active_cart<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<cart::Model, ServiceError> {
    let new_cart = cart::ActiveModel {
        user_id: Set(user_id),
        name: Set(cart::DEFAULT_CART_NAME.to_owned()),
        status: Set(CartStatus::Active),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_cart.insert(db).await {
        Ok(cart) => {
            tracing::debug!(user_id, cart_id = cart.id, "created active cart");
            Ok(cart)
        }
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => find_active_cart(db, user_id)
                .await?
                .ok_or(ServiceError::Database(err)),
            _ => Err(err.into()),
        },
    }
}

pub async fn add_item(
    db: &DatabaseConnection,
    user_id: i32,
    item_id: i32,
    quantity: i32,
) -> Result<AddedItem, ServiceError> {
    if quantity < 1 {
        return Err(ServiceError::InvalidQuantity(quantity));
    }

    let txn = db.begin().await?;
    let item = catalog::get_item(&txn, item_id).await?;
    let cart = get_or_create_active_cart(&txn, user_id).await?;
    ensure_writable(&cart)?;

    let existing = CartItemEntity::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .filter(cart_item::Column::ItemId.eq(item_id))
        .order_by_asc(cart_item::Column::Id)
        .one(&txn)
        .await?;

    match existing {
        Some(line) => {
            let merged = line
                .quantity
                .checked_add(quantity)
                .ok_or(ServiceError::QuantityOverflow(item_id))?;
            let mut line: cart_item::ActiveModel = line.into();
            line.quantity = Set(merged);
            line.update(&txn).await?;
            tracing::debug!(cart_id = cart.id, item_id, quantity = merged, "merged cart line");
        }
        None => {
            cart_item::ActiveModel {
                cart_id: Set(cart.id),
                item_id: Set(item_id),
                quantity: Set(quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            tracing::debug!(cart_id = cart.id, item_id, quantity, "added cart line");
        }
    }

    txn.commit().await?;
    Ok(AddedItem {
        cart_id: cart.id,
        item,
    })
}

/// `None` when the user has no active cart yet.
pub async fn get_cart<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<CartContents>, ServiceError> {
    let Some(cart) = find_active_cart(db, user_id).await? else {
        return Ok(None);
    };

    let rows = cart_lines(db, cart.id).await?;
    let items = line_items(db, &rows).await?;
    Ok(Some(CartContents { cart, items }))
}

pub async fn cleanup(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<cart_item::Model>, ServiceError> {
    let txn = db.begin().await?;
    let cart = find_active_cart(&txn, user_id)
        .await?
        .ok_or(ServiceError::NoActiveCart)?;

    let rows = coalesce(&txn, &cart).await?;
    txn.commit().await?;
    Ok(rows)
}

pub async fn delete_item(
    db: &DatabaseConnection,
    user_id: i32,
    item_id: i32,
) -> Result<u64, ServiceError> {
    let txn = db.begin().await?;
    let cart = find_active_cart(&txn, user_id)
        .await?
        .ok_or(ServiceError::NoActiveCart)?;
    ensure_writable(&cart)?;

    let deleted = CartItemEntity::delete_many()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .filter(cart_item::Column::ItemId.eq(item_id))
        .exec(&txn)
        .await?
        .rows_affected;

    txn.commit().await?;
    tracing::debug!(cart_id = cart.id, item_id, deleted, "removed cart lines");
    Ok(deleted)
}

pub(crate) fn ensure_writable(cart: &cart::Model) -> Result<(), ServiceError> {
    if cart.is_active() {
        Ok(())
    } else {
        Err(ServiceError::CartFrozen(cart.id))
    }
}

pub(crate) async fn cart_lines<C: ConnectionTrait>(
    db: &C,
    cart_id: i32,
) -> Result<Vec<cart_item::Model>, DbErr> {
    CartItemEntity::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .order_by_asc(cart_item::Column::Id)
        .all(db)
        .await
}

// already coalesced carts are left untouched
pub(crate) async fn coalesce<C: ConnectionTrait>(
    db: &C,
    cart: &cart::Model,
) -> Result<Vec<cart_item::Model>, ServiceError> {
    ensure_writable(cart)?;

    let rows = cart_lines(db, cart.id).await?;
    let quantities = merged_quantities(&rows)?;
    if quantities.len() == rows.len() {
        return Ok(rows);
    }

    CartItemEntity::delete_many()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .exec(db)
        .await?;

    let merged: Vec<cart_item::ActiveModel> = quantities
        .iter()
        .map(|(&item_id, &quantity)| cart_item::ActiveModel {
            cart_id: Set(cart.id),
            item_id: Set(item_id),
            quantity: Set(quantity),
            ..Default::default()
        })
        .collect();
    CartItemEntity::insert_many(merged).exec(db).await?;

    tracing::info!(
        cart_id = cart.id,
        before = rows.len(),
        after = quantities.len(),
        "coalesced duplicate cart lines"
    );
    Ok(cart_lines(db, cart.id).await?)
}

/// Sums quantities per item id, ordered by item id.
pub(crate) fn merged_quantities(
    rows: &[cart_item::Model],
) -> Result<BTreeMap<i32, i32>, ServiceError> {
    let mut quantities = BTreeMap::new();
    for row in rows {
        let total: &mut i32 = quantities.entry(row.item_id).or_insert(0);
        *total = total
            .checked_add(row.quantity)
            .ok_or(ServiceError::QuantityOverflow(row.item_id))?;
    }
    Ok(quantities)
}

/// Lines whose item has disappeared from the catalog are skipped.
pub(crate) async fn line_items<C: ConnectionTrait>(
    db: &C,
    rows: &[cart_item::Model],
) -> Result<Vec<LineItem>, ServiceError> {
    let quantities = merged_quantities(rows)?;
    if quantities.is_empty() {
        return Ok(Vec::new());
    }

    let mut items: HashMap<i32, item::Model> = ItemEntity::find()
        .filter(item::Column::Id.is_in(quantities.keys().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    Ok(quantities
        .into_iter()
        .filter_map(|(item_id, quantity)| match items.remove(&item_id) {
            Some(item) => Some(LineItem { item, quantity }),
            None => {
                tracing::warn!(item_id, "cart line references a missing item");
                None
            }
        })
        .collect())
}
