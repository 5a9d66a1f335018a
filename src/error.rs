use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    response::{ApiResponse, Meta},
    store::StoreError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidCredential,

    #[error("Token expired")]
    ExpiredCredential,

    #[error("Cart not found")]
    CartNotFound,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart already holds items from restaurant {0}")]
    RestaurantMismatch(String),

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Service unavailable")]
    Store(#[from] StoreError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::CartNotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail | AppError::EmptyCart | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials
            | AppError::InvalidCredential
            | AppError::ExpiredCredential => StatusCode::UNAUTHORIZED,
            AppError::RestaurantMismatch(_) => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(err) => tracing::error!(error = %err, "store call failed"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
            _ => {}
        }

        let status = self.status();
        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
