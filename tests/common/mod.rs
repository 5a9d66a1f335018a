#![allow(dead_code)]

use std::sync::Arc;

use food_ordering_api::{
    dto::cart::AddToCartRequest,
    models::{MenuItem, Restaurant},
    services::identity_service::IdentityService,
    state::AppState,
    store::{MemoryStore, collections, to_document},
};
use rust_decimal::Decimal;

pub const TEST_SECRET: &str = "test-secret";

pub fn memory_state() -> AppState {
    AppState::new(
        Arc::new(MemoryStore::new()),
        IdentityService::new(TEST_SECRET, 24),
    )
}

/// `cents` keeps prices exact, e.g. `price(1099)` is 10.99.
pub fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub async fn insert_restaurant(state: &AppState, id: &str, name: &str) -> anyhow::Result<()> {
    let restaurant = Restaurant {
        id: id.into(),
        name: name.into(),
        description: format!("{name} test kitchen"),
        image: format!("https://img.test/{id}.jpg"),
        cuisine_type: "Test".into(),
        rating: 4.0,
        delivery_time: "20-30 min".into(),
        min_order: price(1000),
    };
    state
        .store
        .insert_one(collections::RESTAURANTS, to_document(&restaurant)?)
        .await?;
    Ok(())
}

pub async fn insert_menu_item(
    state: &AppState,
    id: &str,
    restaurant_id: &str,
    item_price: Decimal,
) -> anyhow::Result<()> {
    let item = MenuItem {
        id: id.into(),
        restaurant_id: restaurant_id.into(),
        name: format!("Dish {id}"),
        description: "test dish".into(),
        price: item_price,
        image: format!("https://img.test/{id}.jpg"),
        category: "Mains".into(),
        available: true,
    };
    state
        .store
        .insert_one(collections::MENU_ITEMS, to_document(&item)?)
        .await?;
    Ok(())
}

pub fn add(menu_item_id: &str, quantity: i32, restaurant_id: &str) -> AddToCartRequest {
    AddToCartRequest {
        menu_item_id: menu_item_id.into(),
        quantity,
        restaurant_id: restaurant_id.into(),
    }
}
