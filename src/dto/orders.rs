use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Order;

pub const DEFAULT_PAYMENT_METHOD: &str = "card";

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub delivery_address: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

impl PlaceOrderRequest {
    pub fn new(delivery_address: impl Into<String>) -> Self {
        Self {
            delivery_address: delivery_address.into(),
            payment_method: default_payment_method(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlacedOrder {
    pub order_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
