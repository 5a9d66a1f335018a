use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::catalog::SeedOutcome,
    error::AppResult,
    response::ApiResponse,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/seed-data", post(seed_data))
}

#[utoipa::path(
    post,
    path = "/api/seed-data",
    responses(
        (status = 200, description = "Seed the catalog once; later calls are no-ops", body = ApiResponse<SeedOutcome>)
    ),
    tag = "Seed"
)]
pub async fn seed_data(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SeedOutcome>>> {
    let outcome = state.seeder.seed().await?;
    let message = if outcome.seeded {
        "Data seeded successfully"
    } else {
        "Data already seeded"
    };
    Ok(Json(ApiResponse::success(message, outcome, None)))
}
