use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    models::{DEFAULT_ROLE, User, UserProfile, UserSummary},
    password::{hash_password, verify_password},
    services::{identity_service::IdentityService, locks::UserLocks},
    store::{Filter, Store, StoreError, collections, fetch_one, to_document},
};

/// Registration, login and credential resolution.
#[derive(Clone)]
pub struct AccountManager {
    store: Store,
    identity: IdentityService,
    // Keyed by email; serializes the check-then-insert in `register`.
    registrations: UserLocks,
}

impl AccountManager {
    pub fn new(store: Store, identity: IdentityService) -> Self {
        Self {
            store,
            identity,
            registrations: UserLocks::new(),
        }
    }

    pub async fn register(&self, payload: RegisterRequest) -> AppResult<AuthResponse> {
        payload.validate()?;
        let RegisterRequest {
            email,
            password,
            name,
            phone,
            address,
        } = payload;

        let _guard = self.registrations.lock(&email).await;
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password(&password)?,
            name,
            phone,
            address,
            role: DEFAULT_ROLE.to_string(),
        };
        // The unique index still catches a racing registration in another process.
        match self
            .store
            .insert_one(collections::USERS, to_document(&user)?)
            .await
        {
            Err(StoreError::Duplicate(_)) => return Err(AppError::DuplicateEmail),
            other => other?,
        }

        let token = self.identity.issue(&user.id, &user.role)?;
        tracing::info!(user_id = %user.id, "user registered");
        audit::record(
            self.store.as_ref(),
            Some(&user.id),
            "user_register",
            Some(collections::USERS),
            Some(serde_json::json!({ "user_id": user.id })),
        )
        .await;

        Ok(AuthResponse {
            token,
            user: UserSummary::from(&user),
        })
    }

    pub async fn login(&self, payload: LoginRequest) -> AppResult<AuthResponse> {
        let LoginRequest { email, password } = payload;

        // Unknown email and wrong password must be indistinguishable.
        let user = match self.find_by_email(&email).await? {
            Some(user) if verify_password(&password, &user.password_hash) => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        let token = self.identity.issue(&user.id, &user.role)?;
        audit::record(
            self.store.as_ref(),
            Some(&user.id),
            "user_login",
            Some(collections::USERS),
            Some(serde_json::json!({ "user_id": user.id })),
        )
        .await;

        Ok(AuthResponse {
            token,
            user: UserSummary::from(&user),
        })
    }

    pub fn resolve_identity(&self, credential: &str) -> AppResult<String> {
        Ok(self.identity.verify(credential)?.sub)
    }

    pub async fn me(&self, user_id: &str) -> AppResult<UserProfile> {
        let user: Option<User> = fetch_one(
            self.store.as_ref(),
            collections::USERS,
            &Filter::all().eq("id", user_id),
        )
        .await?;
        user.map(UserProfile::from).ok_or(AppError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(fetch_one(
            self.store.as_ref(),
            collections::USERS,
            &Filter::all().eq("email", email),
        )
        .await?)
    }
}
