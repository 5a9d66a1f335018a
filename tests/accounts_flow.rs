mod common;

use food_ordering_api::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    models::User,
    store::{Filter, collections, fetch_one},
};

fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: "hunter22".into(),
        name: "Ada Lovelace".into(),
        phone: "+44 20 0000 0000".into(),
        address: "12 Analytical Row".into(),
    }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn register_issues_token_for_new_user() -> anyhow::Result<()> {
    let state = common::memory_state();

    let auth = state.accounts.register(registration("ada@example.com")).await?;
    assert_eq!(auth.user.email, "ada@example.com");
    assert_eq!(auth.user.name, "Ada Lovelace");
    assert_eq!(state.accounts.resolve_identity(&auth.token)?, auth.user.id);

    let stored: User = fetch_one(
        state.store.as_ref(),
        collections::USERS,
        &Filter::all().eq("id", auth.user.id.as_str()),
    )
    .await?
    .expect("user stored");
    assert_ne!(stored.password_hash, "hunter22");
    assert_eq!(stored.role, "user");
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email() -> anyhow::Result<()> {
    let state = common::memory_state();
    state.accounts.register(registration("ada@example.com")).await?;

    let err = state
        .accounts
        .register(registration("ada@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail));

    let users = state.store.count(collections::USERS, &Filter::all()).await?;
    assert_eq!(users, 1);
    Ok(())
}

#[tokio::test]
async fn register_rejects_malformed_email() {
    let state = common::memory_state();
    let err = state
        .accounts
        .register(registration("not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn login_round_trips_registered_user() -> anyhow::Result<()> {
    let state = common::memory_state();
    let registered = state.accounts.register(registration("ada@example.com")).await?;

    let auth = state
        .accounts
        .login(login("ada@example.com", "hunter22"))
        .await?;
    assert_eq!(auth.user.id, registered.user.id);
    assert_eq!(state.accounts.resolve_identity(&auth.token)?, registered.user.id);
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> anyhow::Result<()> {
    let state = common::memory_state();
    state.accounts.register(registration("ada@example.com")).await?;

    let wrong_password = state
        .accounts
        .login(login("ada@example.com", "wrong"))
        .await
        .unwrap_err();
    let unknown_email = state
        .accounts
        .login(login("nobody@example.com", "hunter22"))
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.status(), unknown_email.status());
    Ok(())
}

#[tokio::test]
async fn me_returns_profile_without_secret() -> anyhow::Result<()> {
    let state = common::memory_state();
    let auth = state.accounts.register(registration("ada@example.com")).await?;

    let profile = state.accounts.me(&auth.user.id).await?;
    assert_eq!(profile.email, "ada@example.com");
    assert_eq!(profile.role, "user");
    assert_eq!(profile.address, "12 Analytical Row");

    let json = serde_json::to_value(&profile)?;
    assert!(json.get("password_hash").is_none());

    let err = state.accounts.me("missing-user").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn resolve_identity_rejects_garbage() {
    let state = common::memory_state();
    let err = state.accounts.resolve_identity("not.a.jwt").unwrap_err();
    assert!(matches!(err, AppError::InvalidCredential));
}

#[tokio::test]
async fn register_and_login_are_audited() -> anyhow::Result<()> {
    let state = common::memory_state();
    let auth = state.accounts.register(registration("ada@example.com")).await?;
    state
        .accounts
        .login(login("ada@example.com", "hunter22"))
        .await?;

    let entries = state
        .store
        .count(
            collections::AUDIT_LOGS,
            &Filter::all().eq("user_id", auth.user.id.as_str()),
        )
        .await?;
    assert_eq!(entries, 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_create_one_user() -> anyhow::Result<()> {
    let state = common::memory_state();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let accounts = state.accounts.clone();
            tokio::spawn(async move { accounts.register(registration("dup@example.com")).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, AppError::DuplicateEmail), "{err}"),
        }
    }
    assert_eq!(created, 1);

    let users = state
        .store
        .count(collections::USERS, &Filter::all().eq("email", "dup@example.com"))
        .await?;
    assert_eq!(users, 1);
    Ok(())
}
