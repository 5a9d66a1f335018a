use axum::{extract::FromRequestParts, http::header};

use crate::{error::AppError, state::AppState};

/// The caller resolved from a `Bearer` credential.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::InvalidCredential)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::InvalidCredential)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::InvalidCredential)?;

        let claims = state.identity.verify(token)?;
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
