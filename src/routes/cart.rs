use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post, put},
};

use crate::{
    dto::cart::{AddToCartRequest, EnrichedCart, ReconcileResponse, UpdateCartItemRequest},
    error::AppResult,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/add", post(add_to_cart))
        .route("/update", put(update_cart_item))
        .route("/remove/{menu_item_id}", delete(remove_from_cart))
        .route("/clear", delete(clear_cart))
        .route("/reconcile", post(reconcile_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart with current menu details", body = ApiResponse<EnrichedCart>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<EnrichedCart>>> {
    let cart = state.carts.get_cart(&user.user_id).await?;
    let meta = Meta::total(cart.items.len());
    Ok(Json(ApiResponse::success("OK", cart, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added to cart", body = ApiResponse<serde_json::Value>),
        (status = 409, description = "Cart holds items from another restaurant"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    state.carts.add_item(&user.user_id, payload).await?;
    Ok(Json(ApiResponse::message("Item added to cart")))
}

#[utoipa::path(
    put,
    path = "/api/cart/update",
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Cart updated", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    state.carts.update_item(&user.user_id, payload).await?;
    Ok(Json(ApiResponse::message("Cart updated")))
}

#[utoipa::path(
    delete,
    path = "/api/cart/remove/{menu_item_id}",
    params(
        ("menu_item_id" = String, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Item removed from cart", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(menu_item_id): AppPath<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    state.carts.remove_item(&user.user_id, &menu_item_id).await?;
    Ok(Json(ApiResponse::message("Item removed from cart")))
}

#[utoipa::path(
    delete,
    path = "/api/cart/clear",
    responses(
        (status = 200, description = "Cart cleared", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    state.carts.clear(&user.user_id).await?;
    Ok(Json(ApiResponse::message("Cart cleared")))
}

#[utoipa::path(
    post,
    path = "/api/cart/reconcile",
    responses(
        (status = 200, description = "Lines pointing at deleted menu items were removed", body = ApiResponse<ReconcileResponse>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn reconcile_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReconcileResponse>>> {
    let removed = state.carts.reconcile(&user.user_id).await?;
    let meta = Meta::total(removed.len());
    Ok(Json(ApiResponse::success(
        "Cart reconciled",
        ReconcileResponse { removed },
        Some(meta),
    )))
}
