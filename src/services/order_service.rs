use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::PlaceOrderRequest,
    error::{AppError, AppResult},
    models::{Cart, CartLine, ORDER_STATUS_PLACED, Order, OrderLine},
    services::{catalog_service::CatalogReader, locks::UserLocks},
    store::{Filter, Store, WriteOp, collections, fetch_many, fetch_one, set_field, to_document},
};

const UNKNOWN_RESTAURANT: &str = "Unknown";

/// Turns a user's cart into an immutable, priced order.
#[derive(Clone)]
pub struct OrderBuilder {
    store: Store,
    catalog: CatalogReader,
    locks: UserLocks,
}

impl OrderBuilder {
    pub fn new(store: Store, catalog: CatalogReader, locks: UserLocks) -> Self {
        Self {
            store,
            catalog,
            locks,
        }
    }

    /// Prices the cart against the current catalog, then stores the order and
    /// empties the cart in one commit. Lines whose menu item is gone are skipped.
    pub async fn place_order(
        &self,
        user_id: &str,
        payload: PlaceOrderRequest,
    ) -> AppResult<Order> {
        let _guard = self.locks.lock(user_id).await;
        let cart_filter = Filter::all().eq("user_id", user_id);

        let cart: Option<Cart> =
            fetch_one(self.store.as_ref(), collections::CARTS, &cart_filter).await?;
        let cart = match cart {
            Some(cart) if !cart.is_empty() => cart,
            _ => return Err(AppError::EmptyCart),
        };

        let mut items = Vec::with_capacity(cart.items.len());
        let mut total_amount = Decimal::ZERO;
        let mut restaurant: Option<(String, String)> = None;

        for line in &cart.items {
            let Some(menu_item) = self.catalog.get_menu_item(&line.menu_item_id).await? else {
                tracing::debug!(user_id, menu_item_id = %line.menu_item_id, "skipping stale cart line");
                continue;
            };

            if restaurant.is_none() {
                let name = self
                    .catalog
                    .find_restaurant(&menu_item.restaurant_id)
                    .await?
                    .map(|r| r.name)
                    .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_string());
                restaurant = Some((menu_item.restaurant_id.clone(), name));
            }

            total_amount += menu_item.price * Decimal::from(line.quantity);
            items.push(OrderLine {
                menu_item_id: menu_item.id,
                name: menu_item.name,
                price: menu_item.price,
                quantity: line.quantity,
            });
        }

        let (restaurant_id, restaurant_name) = restaurant.unzip();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            restaurant_id,
            restaurant_name,
            items,
            total_amount,
            status: ORDER_STATUS_PLACED.to_string(),
            delivery_address: payload.delivery_address,
            payment_method: payload.payment_method,
            created_at: Utc::now(),
        };

        self.store
            .commit(vec![
                WriteOp::Insert {
                    collection: collections::ORDERS.to_string(),
                    document: to_document(&order)?,
                },
                WriteOp::Update {
                    collection: collections::CARTS.to_string(),
                    filter: cart_filter,
                    set: set_field("items", &Vec::<CartLine>::new())?,
                    upsert: false,
                },
            ])
            .await?;

        tracing::info!(
            user_id,
            order_id = %order.id,
            total = %order.total_amount,
            lines = order.items.len(),
            "order placed"
        );
        audit::record(
            self.store.as_ref(),
            Some(user_id),
            "order_placed",
            Some(collections::ORDERS),
            Some(serde_json::json!({ "order_id": order.id, "total_amount": order.total_amount })),
        )
        .await;

        Ok(order)
    }

    /// Newest first.
    pub async fn list_orders(&self, user_id: &str) -> AppResult<Vec<Order>> {
        let mut orders: Vec<Order> = fetch_many(
            self.store.as_ref(),
            collections::ORDERS,
            &Filter::all().eq("user_id", user_id),
        )
        .await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Another user's order is reported as missing.
    pub async fn get_order(&self, user_id: &str, order_id: &str) -> AppResult<Order> {
        let order: Option<Order> = fetch_one(
            self.store.as_ref(),
            collections::ORDERS,
            &Filter::all().eq("id", order_id).eq("user_id", user_id),
        )
        .await?;
        order.ok_or(AppError::NotFound)
    }
}
