use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::{
    audit,
    dto::cart::{AddToCartRequest, CartItemView, EnrichedCart, UpdateCartItemRequest},
    error::{AppError, AppResult},
    models::{Cart, CartLine},
    services::{catalog_service::CatalogReader, locks::UserLocks},
    store::{Filter, Store, collections, fetch_one, set_field},
};

/// Owns per-user cart state. Every mutation runs under the user's lock.
#[derive(Clone)]
pub struct CartManager {
    store: Store,
    catalog: CatalogReader,
    locks: UserLocks,
}

fn cart_filter(user_id: &str) -> Filter {
    Filter::all().eq("user_id", user_id)
}

impl CartManager {
    pub fn new(store: Store, catalog: CatalogReader, locks: UserLocks) -> Self {
        Self {
            store,
            catalog,
            locks,
        }
    }

    /// The cart exactly as persisted, stale lines included.
    pub async fn stored_cart(&self, user_id: &str) -> AppResult<Option<Cart>> {
        Ok(fetch_one(self.store.as_ref(), collections::CARTS, &cart_filter(user_id)).await?)
    }

    pub async fn get_cart(&self, user_id: &str) -> AppResult<EnrichedCart> {
        let mut view = EnrichedCart::empty(user_id);
        let Some(cart) = self.stored_cart(user_id).await? else {
            return Ok(view);
        };

        for CartLine {
            menu_item_id,
            quantity,
            restaurant_id,
        } in cart.items
        {
            match self.catalog.get_menu_item(&menu_item_id).await? {
                Some(item) => {
                    view.subtotal += item.price * Decimal::from(quantity);
                    view.items.push(CartItemView {
                        menu_item_id,
                        quantity,
                        restaurant_id,
                        name: item.name,
                        price: item.price,
                        image: item.image,
                    });
                }
                None => view.stale_items.push(menu_item_id),
            }
        }
        Ok(view)
    }

    pub async fn add_item(&self, user_id: &str, payload: AddToCartRequest) -> AppResult<Cart> {
        let _guard = self.locks.lock(user_id).await;
        let mut cart = self
            .stored_cart(user_id)
            .await?
            .unwrap_or_else(|| Cart::new(user_id));

        cart.add(
            &payload.menu_item_id,
            payload.quantity,
            &payload.restaurant_id,
        )?;
        self.save(&cart).await?;

        audit::record(
            self.store.as_ref(),
            Some(user_id),
            "cart_update",
            Some(collections::CARTS),
            Some(serde_json::json!({
                "menu_item_id": payload.menu_item_id,
                "quantity": payload.quantity,
            })),
        )
        .await;
        Ok(cart)
    }

    /// A missing line is not an error; the cart is returned unchanged.
    pub async fn update_item(
        &self,
        user_id: &str,
        payload: UpdateCartItemRequest,
    ) -> AppResult<Cart> {
        let _guard = self.locks.lock(user_id).await;
        let mut cart = self
            .stored_cart(user_id)
            .await?
            .ok_or(AppError::CartNotFound)?;

        if cart.set_quantity(&payload.menu_item_id, payload.quantity) {
            self.save(&cart).await?;
            audit::record(
                self.store.as_ref(),
                Some(user_id),
                "cart_update",
                Some(collections::CARTS),
                Some(serde_json::json!({
                    "menu_item_id": payload.menu_item_id,
                    "quantity": payload.quantity,
                })),
            )
            .await;
        }
        Ok(cart)
    }

    pub async fn remove_item(&self, user_id: &str, menu_item_id: &str) -> AppResult<Cart> {
        let _guard = self.locks.lock(user_id).await;
        let mut cart = self
            .stored_cart(user_id)
            .await?
            .ok_or(AppError::CartNotFound)?;

        if cart.remove(menu_item_id) {
            self.save(&cart).await?;
            audit::record(
                self.store.as_ref(),
                Some(user_id),
                "cart_remove",
                Some(collections::CARTS),
                Some(serde_json::json!({ "menu_item_id": menu_item_id })),
            )
            .await;
        }
        Ok(cart)
    }

    pub async fn clear(&self, user_id: &str) -> AppResult<()> {
        let _guard = self.locks.lock(user_id).await;
        self.save(&Cart::new(user_id)).await?;
        audit::record(
            self.store.as_ref(),
            Some(user_id),
            "cart_clear",
            Some(collections::CARTS),
            None,
        )
        .await;
        Ok(())
    }

    /// Prunes lines whose menu item no longer exists and returns their ids.
    pub async fn reconcile(&self, user_id: &str) -> AppResult<Vec<String>> {
        let _guard = self.locks.lock(user_id).await;
        let Some(mut cart) = self.stored_cart(user_id).await? else {
            return Ok(Vec::new());
        };

        let mut missing = HashSet::new();
        for line in &cart.items {
            if self.catalog.get_menu_item(&line.menu_item_id).await?.is_none() {
                missing.insert(line.menu_item_id.clone());
            }
        }
        if missing.is_empty() {
            return Ok(Vec::new());
        }

        let removed = cart.retain_lines(|line| !missing.contains(&line.menu_item_id));
        self.save(&cart).await?;
        tracing::info!(user_id, removed = removed.len(), "cart reconciled");
        audit::record(
            self.store.as_ref(),
            Some(user_id),
            "cart_reconcile",
            Some(collections::CARTS),
            Some(serde_json::json!({ "removed": removed })),
        )
        .await;
        Ok(removed)
    }

    /// Field-level write of the line set; creates the cart document on first use.
    async fn save(&self, cart: &Cart) -> AppResult<()> {
        self.store
            .update_one(
                collections::CARTS,
                &cart_filter(&cart.user_id),
                set_field("items", &cart.items)?,
                true,
            )
            .await?;
        Ok(())
    }
}
