use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::orders::{OrderList, PlaceOrderRequest, PlacedOrder},
    error::AppResult,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(place_order))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed from the current cart", body = ApiResponse<PlacedOrder>),
        (status = 400, description = "Cart is empty"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PlacedOrder>>)> {
    let order = state.orders.place_order(&user.user_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Order placed successfully",
            PlacedOrder { order_id: order.id },
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders of the current user, newest first", body = ApiResponse<OrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let items = state.orders.list_orders(&user.user_id).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success("Ok", OrderList { items }, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Get order", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get_order(&user.user_id, &id).await?;
    Ok(Json(ApiResponse::success("OK", order, Some(Meta::empty()))))
}
