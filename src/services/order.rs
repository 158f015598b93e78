use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;

use crate::entities::{
    cart::{self, CartStatus},
    cart_item::{self, Entity as CartItemEntity},
    order::{self, Entity as OrderEntity},
};
use crate::error::ServiceError;
use crate::services::cart::{cart_lines, coalesce, find_active_cart, line_items, LineItem};

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedOrder {
    pub order_id: i32,
    pub items: Vec<LineItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderSummary {
    pub id: i32,
    pub cart_id: i32,
    pub created_at: chrono::DateTime<Utc>,
    pub items: Vec<LineItem>,
}

// lines are not copied; the frozen cart's rows are the order's contents
pub async fn place_order(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<PlacedOrder, ServiceError> {
    let txn = db.begin().await?;
    let cart = find_active_cart(&txn, user_id)
        .await?
        .ok_or(ServiceError::NoActiveCart)?;

    let lines = CartItemEntity::find()
        .filter(cart_item::Column::CartId.eq(cart.id))
        .count(&txn)
        .await?;
    if lines == 0 {
        return Err(ServiceError::EmptyCart);
    }

    let rows = coalesce(&txn, &cart).await?;

    let order = order::ActiveModel {
        cart_id: Set(cart.id),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let cart_id = cart.id;
    let mut cart: cart::ActiveModel = cart.into();
    cart.status = Set(CartStatus::Ordered);
    cart.update(&txn).await?;

    let items = line_items(&txn, &rows).await?;
    txn.commit().await?;

    tracing::info!(user_id, order_id = order.id, cart_id, lines = rows.len(), "placed order");
    Ok(PlacedOrder {
        order_id: order.id,
        items,
    })
}

pub async fn list_orders<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<OrderSummary>, ServiceError> {
    let orders = OrderEntity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_asc(order::Column::Id)
        .all(db)
        .await?;

    let mut summaries = Vec::with_capacity(orders.len());
    for order in orders {
        let rows = cart_lines(db, order.cart_id).await?;
        summaries.push(OrderSummary {
            id: order.id,
            cart_id: order.cart_id,
            created_at: order.created_at,
            items: line_items(db, &rows).await?,
        });
    }
    Ok(summaries)
}
