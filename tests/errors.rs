use axum::{http::StatusCode, response::IntoResponse};
use food_ordering_api::{error::AppError, store::StoreError};

#[test]
fn errors_map_to_statuses() {
    let cases = [
        (AppError::NotFound, StatusCode::NOT_FOUND),
        (AppError::CartNotFound, StatusCode::NOT_FOUND),
        (AppError::DuplicateEmail, StatusCode::BAD_REQUEST),
        (AppError::EmptyCart, StatusCode::BAD_REQUEST),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
        (AppError::InvalidCredential, StatusCode::UNAUTHORIZED),
        (AppError::ExpiredCredential, StatusCode::UNAUTHORIZED),
        (AppError::RestaurantMismatch("r1".into()), StatusCode::CONFLICT),
        (
            AppError::Store(StoreError::NotADocument("1".into())),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
        (
            AppError::Internal(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.status(), expected, "{err}");
        assert_eq!(err.into_response().status(), expected);
    }
}

#[test]
fn login_error_does_not_reveal_which_part_failed() {
    assert_eq!(
        AppError::InvalidCredentials.to_string(),
        "Invalid email or password"
    );
}
