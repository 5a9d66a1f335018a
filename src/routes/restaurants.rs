use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::catalog::{MenuList, RestaurantList},
    error::AppResult,
    extract::{AppPath, AppQuery},
    models::Restaurant,
    response::{ApiResponse, Meta},
    routes::params::{MenuQuery, RestaurantQuery},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_restaurants))
        .route("/{id}", get(get_restaurant))
        .route("/{id}/menu", get(list_menu))
}

#[utoipa::path(
    get,
    path = "/api/restaurants",
    params(RestaurantQuery),
    responses(
        (status = 200, description = "List restaurants", body = ApiResponse<RestaurantList>)
    ),
    tag = "Restaurants"
)]
pub async fn list_restaurants(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RestaurantQuery>,
) -> AppResult<Json<ApiResponse<RestaurantList>>> {
    let items = state
        .catalog
        .list_restaurants(query.search.as_deref(), query.cuisine.as_deref())
        .await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Restaurants",
        RestaurantList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    params(
        ("id" = String, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Get restaurant", body = ApiResponse<Restaurant>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Restaurants"
)]
pub async fn get_restaurant(
    AppPath(id): AppPath<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let restaurant = state.catalog.get_restaurant(&id).await?;
    Ok(Json(ApiResponse::success("Restaurant", restaurant, None)))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}/menu",
    params(
        ("id" = String, Path, description = "Restaurant ID"),
        MenuQuery
    ),
    responses(
        (status = 200, description = "Menu items of a restaurant", body = ApiResponse<MenuList>)
    ),
    tag = "Restaurants"
)]
pub async fn list_menu(
    AppPath(id): AppPath<String>,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let items = state
        .catalog
        .list_menu(&id, query.category.as_deref())
        .await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success("Menu", MenuList { items }, Some(meta))))
}
