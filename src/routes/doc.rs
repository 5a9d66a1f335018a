use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        cart::{AddToCartRequest, CartItemView, EnrichedCart, ReconcileResponse, UpdateCartItemRequest},
        catalog::{MenuList, RestaurantList, SeedOutcome},
        orders::{OrderList, PlaceOrderRequest, PlacedOrder},
    },
    models::{MenuItem, Order, OrderLine, Restaurant, UserProfile, UserSummary},
    response::{ApiResponse, Meta},
    routes::{auth, cart, health, orders, restaurants, seed},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        restaurants::list_restaurants,
        restaurants::get_restaurant,
        restaurants::list_menu,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::reconcile_cart,
        orders::place_order,
        orders::list_orders,
        orders::get_order,
        seed::seed_data
    ),
    components(
        schemas(
            UserSummary,
            UserProfile,
            Restaurant,
            MenuItem,
            Order,
            OrderLine,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartItemView,
            EnrichedCart,
            ReconcileResponse,
            PlaceOrderRequest,
            PlacedOrder,
            OrderList,
            RestaurantList,
            MenuList,
            SeedOutcome,
            health::HealthData,
            Meta,
            ApiResponse<AuthResponse>,
            ApiResponse<EnrichedCart>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<RestaurantList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and current user"),
        (name = "Restaurants", description = "Restaurant and menu browsing"),
        (name = "Cart", description = "Per-user shopping cart"),
        (name = "Orders", description = "Order placement and history"),
        (name = "Seed", description = "One-time catalog seeding"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
