use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

pub const DEFAULT_ROLE: &str = "user";
pub const ORDER_STATUS_PLACED: &str = "placed";

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn default_available() -> bool {
    true
}

/// Stored user document. Never serialized into a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub role: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            address: user.address,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub cuisine_type: String,
    pub rating: f64,
    pub delivery_time: String,
    pub min_order: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub menu_item_id: String,
    pub quantity: i32,
    pub restaurant_id: String,
}

/// A user's cart: at most one line per menu item, kept in insertion order.
///
/// All mutation goes through the methods below so the one-line-per-item and
/// single-restaurant invariants hold for whatever is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<CartLine>,
}

impl Cart {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line(&self, menu_item_id: &str) -> Option<&CartLine> {
        self.items
            .iter()
            .find(|line| line.menu_item_id == menu_item_id)
    }

    /// Restaurant the cart is currently bound to, if it holds any line.
    pub fn restaurant_id(&self) -> Option<&str> {
        self.items.first().map(|line| line.restaurant_id.as_str())
    }

    /// Increments an existing line in place or appends a new one.
    pub fn add(
        &mut self,
        menu_item_id: &str,
        quantity: i32,
        restaurant_id: &str,
    ) -> Result<(), AppError> {
        if let Some(current) = self.restaurant_id() {
            if current != restaurant_id {
                return Err(AppError::RestaurantMismatch(current.to_string()));
            }
        }

        match self
            .items
            .iter_mut()
            .find(|line| line.menu_item_id == menu_item_id)
        {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or_else(|| {
                    AppError::BadRequest(format!("quantity for {menu_item_id} is out of range"))
                })?;
            }
            None => self.items.push(CartLine {
                menu_item_id: menu_item_id.to_string(),
                quantity,
                restaurant_id: restaurant_id.to_string(),
            }),
        }
        Ok(())
    }

    /// Stores `quantity` verbatim. Returns false when no line matched.
    pub fn set_quantity(&mut self, menu_item_id: &str, quantity: i32) -> bool {
        match self
            .items
            .iter_mut()
            .find(|line| line.menu_item_id == menu_item_id)
        {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, menu_item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.menu_item_id != menu_item_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drops every line `keep` rejects and returns the dropped menu item ids.
    pub fn retain_lines(&mut self, mut keep: impl FnMut(&CartLine) -> bool) -> Vec<String> {
        let mut dropped = Vec::new();
        self.items.retain(|line| {
            let kept = keep(line);
            if !kept {
                dropped.push(line.menu_item_id.clone());
            }
            kept
        });
        dropped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub menu_item_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: String,
    pub delivery_address: String,
    #[serde(default)]
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLog {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_merges_lines_for_the_same_item() {
        let mut cart = Cart::new("u1");
        cart.add("m1", 2, "r1").unwrap();
        cart.add("m2", 1, "r1").unwrap();
        cart.add("m1", 3, "r1").unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.line("m1").map(|l| l.quantity), Some(5));
        assert_eq!(cart.items[0].menu_item_id, "m1");
    }

    #[test]
    fn add_rejects_a_quantity_that_overflows() {
        let mut cart = Cart::new("u1");
        cart.add("m1", i32::MAX, "r1").unwrap();

        let err = cart.add("m1", 1, "r1").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(cart.line("m1").map(|l| l.quantity), Some(i32::MAX));
    }

    #[test]
    fn add_rejects_a_second_restaurant() {
        let mut cart = Cart::new("u1");
        cart.add("m1", 1, "r1").unwrap();

        let err = cart.add("m9", 1, "r2").unwrap_err();
        assert!(matches!(err, AppError::RestaurantMismatch(ref r) if r == "r1"));
        assert_eq!(cart.items.len(), 1);

        cart.clear();
        assert!(cart.add("m9", 1, "r2").is_ok());
        assert_eq!(cart.restaurant_id(), Some("r2"));
    }

    #[test]
    fn set_quantity_stores_non_positive_values() {
        let mut cart = Cart::new("u1");
        cart.add("m1", 4, "r1").unwrap();

        assert!(cart.set_quantity("m1", 0));
        assert_eq!(cart.line("m1").map(|l| l.quantity), Some(0));
        assert!(cart.set_quantity("m1", -2));
        assert_eq!(cart.line("m1").map(|l| l.quantity), Some(-2));
        assert!(!cart.set_quantity("missing", 7));
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn retain_lines_reports_dropped_ids_in_order() {
        let mut cart = Cart::new("u1");
        for id in ["a", "b", "c", "d"] {
            cart.add(id, 1, "r1").unwrap();
        }

        let dropped = cart.retain_lines(|line| line.menu_item_id == "b" || line.menu_item_id == "d");
        assert_eq!(dropped, vec!["a".to_string(), "c".to_string()]);
        let remaining: Vec<_> = cart.items.iter().map(|l| l.menu_item_id.as_str()).collect();
        assert_eq!(remaining, vec!["b", "d"]);
    }
}
