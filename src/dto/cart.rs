use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub menu_item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub restaurant_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub menu_item_id: String,
    pub quantity: i32,
}

/// A stored cart line joined with the menu item's current name, price and image.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartItemView {
    pub menu_item_id: String,
    pub quantity: i32,
    pub restaurant_id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EnrichedCart {
    pub user_id: String,
    pub items: Vec<CartItemView>,
    /// Lines still stored whose menu item no longer exists.
    pub stale_items: Vec<String>,
    pub subtotal: Decimal,
}

impl EnrichedCart {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            items: Vec::new(),
            stale_items: Vec::new(),
            subtotal: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileResponse {
    pub removed: Vec<String>,
}
