use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{MenuItem, Restaurant};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RestaurantList {
    #[schema(value_type = Vec<Restaurant>)]
    pub items: Vec<Restaurant>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MenuList {
    #[schema(value_type = Vec<MenuItem>)]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct SeedOutcome {
    pub seeded: bool,
    pub restaurants: u64,
    pub menu_items: u64,
}
