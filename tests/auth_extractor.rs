mod common;

use axum::{
    extract::FromRequestParts,
    http::{Request, header, request::Parts},
};
use food_ordering_api::{
    error::AppError, middleware::auth::AuthUser, services::identity_service::IdentityService,
};

fn parts(authorization: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/cart");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(()).expect("request").into_parts().0
}

#[tokio::test]
async fn bearer_token_resolves_user() -> anyhow::Result<()> {
    let state = common::memory_state();
    let token = state.identity.issue("user-1", "user")?;

    let mut parts = parts(Some(&format!("Bearer {token}")));
    let user = AuthUser::from_request_parts(&mut parts, &state).await?;
    assert_eq!(user.user_id, "user-1");
    assert_eq!(user.role, "user");
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_header_is_rejected() {
    let state = common::memory_state();

    for header in [None, Some("Basic abc"), Some("Bearer "), Some("Bearer nonsense")] {
        let mut parts = parts(header);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredential), "{header:?}");
    }
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() -> anyhow::Result<()> {
    let state = common::memory_state();
    let token = IdentityService::new("other-secret", 24).issue("user-1", "user")?;

    let mut parts = parts(Some(&format!("Bearer {token}")));
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredential));
    Ok(())
}
