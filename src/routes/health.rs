use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
    store::{Filter, collections},
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub store: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
        tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let store = match state
        .store
        .count(collections::RESTAURANTS, &Filter::all())
        .await
    {
        Ok(_) => "up",
        Err(err) => {
            tracing::warn!(error = %err, "store health probe failed");
            "down"
        }
    };
    let data = HealthData {
        status: "ok".to_string(),
        store: store.to_string(),
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}
