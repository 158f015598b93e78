pub mod cart;
pub mod cart_item;
pub mod item;
pub mod order;
pub mod user;

use chrono::Utc;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Schema, Set,
    TransactionTrait,
};

use crate::entities::{
    cart::Entity as Cart, cart_item::Entity as CartItem, item::Entity as Item,
    order::Entity as Order, user::Entity as User,
};

/// Only one `active` cart per user. Partial indexes are not expressible
/// through the entity derive, so this one is issued as raw SQL.
const ONE_ACTIVE_CART_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS ux_carts_one_active \
     ON carts (user_id) WHERE status = 'active'";

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut tables = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Item),
        schema.create_table_from_entity(Cart),
        schema.create_table_from_entity(CartItem),
        schema.create_table_from_entity(Order),
    ];
    for table in tables.iter_mut() {
        table.if_not_exists();
        db.execute(backend.build(&*table)).await?;
    }

    let indexes = schema
        .create_index_from_entity(Cart)
        .into_iter()
        .chain(schema.create_index_from_entity(CartItem))
        .chain(schema.create_index_from_entity(Order));
    for mut index in indexes {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    db.execute_unprepared(ONE_ACTIVE_CART_INDEX).await?;

    tracing::debug!("schema ready");
    Ok(())
}

/// Fills an empty catalog with the sample products. Does nothing when any
/// item already exists, so it is safe to call on every boot.
pub async fn seed_catalog(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let txn = db.begin().await?;

    if Item::find().count(&txn).await? > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    let items: Vec<item::ActiveModel> = SAMPLE_ITEMS
        .iter()
        .map(|sample| item::ActiveModel {
            name: Set(sample.name.to_owned()),
            status: Set("active".to_owned()),
            description: Set(sample.description.to_owned()),
            price: Set(sample.price),
            category: Set(sample.category.to_owned()),
            brand: Set("ShopCart".to_owned()),
            image_urls: Set(sample.image.to_owned()),
            created_at: Set(now),
            ..Default::default()
        })
        .collect();
    let inserted = items.len() as u64;

    Item::insert_many(items).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(inserted, "seeded sample catalog");
    Ok(inserted)
}

struct SampleItem {
    name: &'static str,
    description: &'static str,
    price: f64,
    category: &'static str,
    image: &'static str,
}

const SAMPLE_ITEMS: [SampleItem; 12] = [
    SampleItem {
        name: "X-Bud Pro",
        description: "Premium Wireless Earbuds with active noise cancellation, 24-hour battery life, and crystal clear sound quality",
        price: 199.99,
        category: "Earbuds",
        image: "/images/earphonewired.png",
    },
    SampleItem {
        name: "Studio Max",
        description: "Professional Studio Headphones with high-resolution audio and premium build quality",
        price: 299.99,
        category: "Professional",
        image: "/images/headphone.png",
    },
    SampleItem {
        name: "Bass Boost Pro",
        description: "Over-ear headphones with enhanced bass response and comfortable fit",
        price: 249.99,
        category: "Headphones",
        image: "/images/ear1.png",
    },
    SampleItem {
        name: "Gaming Elite",
        description: "Gaming headset with 7.1 surround sound and noise-canceling microphone",
        price: 349.99,
        category: "Gaming",
        image: "/images/ear2.avif",
    },
    SampleItem {
        name: "Sport Wireless",
        description: "Sweat-resistant wireless earbuds perfect for workouts and running",
        price: 129.99,
        category: "Sports",
        image: "/images/speaker1.png",
    },
    SampleItem {
        name: "DJ Master",
        description: "Professional DJ headphones with superior sound isolation and durability",
        price: 399.99,
        category: "Professional",
        image: "/images/speaker.jpg",
    },
    SampleItem {
        name: "Kids Safe",
        description: "Volume-limited headphones designed specifically for children's safety",
        price: 89.99,
        category: "Kids",
        image: "/images/earphonewired.png",
    },
    SampleItem {
        name: "Travel Elite",
        description: "Foldable travel headphones with active noise cancellation",
        price: 279.99,
        category: "Travel",
        image: "/images/headphone.png",
    },
    SampleItem {
        name: "Classic Studio",
        description: "Classic studio monitoring headphones for professional audio production",
        price: 449.99,
        category: "Professional",
        image: "/images/ear1.png",
    },
    SampleItem {
        name: "Workout Plus",
        description: "Over-ear workout headphones with sweat resistance and secure fit",
        price: 199.99,
        category: "Sports",
        image: "/images/ear2.avif",
    },
    SampleItem {
        name: "True Wireless Pro",
        description: "Premium true wireless earbuds with ambient sound mode",
        price: 259.99,
        category: "Earbuds",
        image: "/images/speaker1.png",
    },
    SampleItem {
        name: "Studio Reference",
        description: "Reference-grade studio headphones for mixing and mastering",
        price: 499.99,
        category: "Professional",
        image: "/images/speaker.jpg",
    },
];
