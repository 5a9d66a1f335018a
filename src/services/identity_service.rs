use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
};

/// Upper bound for credential lifetimes; keeps `Duration::hours` in range.
pub const MAX_LIFETIME_HOURS: i64 = 24 * 365 * 10;

/// Issues and verifies signed bearer credentials (HS256 JWTs).
#[derive(Clone)]
pub struct IdentityService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl IdentityService {
    /// `lifetime_hours` is clamped to `1..=MAX_LIFETIME_HOURS`.
    pub fn new(secret: &str, lifetime_hours: i64) -> Self {
        let mut validation = Validation::default();
        // Credentials stop verifying exactly at `exp`.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: Duration::hours(lifetime_hours.clamp(1, MAX_LIFETIME_HOURS)),
        }
    }

    pub fn issue(&self, user_id: &str, role: &str) -> AppResult<String> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issues a credential as if it had been created at `issued_at`.
    pub fn issue_at(&self, user_id: &str, role: &str, issued_at: DateTime<Utc>) -> AppResult<String> {
        let expiration = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp().max(0) as usize,
            exp: expiration.timestamp().max(0) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let decoded = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredCredential,
                _ => AppError::InvalidCredential,
            }
        })?;

        if decoded.claims.sub.is_empty() {
            return Err(AppError::InvalidCredential);
        }
        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_credential_resolves_to_its_user() {
        let identity = IdentityService::new("test-secret", 24);
        let token = identity.issue("user-1", "user").unwrap();

        let claims = identity.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_and_foreign_credentials_are_distinguished() {
        let identity = IdentityService::new("test-secret", 1);
        let stale = identity
            .issue_at("user-1", "user", Utc::now() - Duration::hours(3))
            .unwrap();
        assert!(matches!(identity.verify(&stale), Err(AppError::ExpiredCredential)));

        let other = IdentityService::new("another-secret", 1);
        let foreign = other.issue("user-1", "user").unwrap();
        assert!(matches!(identity.verify(&foreign), Err(AppError::InvalidCredential)));
        assert!(matches!(identity.verify("garbage"), Err(AppError::InvalidCredential)));
    }

    #[test]
    fn credential_fails_right_after_expiry() {
        let identity = IdentityService::new("test-secret", 1);
        let just_expired = identity
            .issue_at(
                "user-1",
                "user",
                Utc::now() - Duration::hours(1) - Duration::seconds(5),
            )
            .unwrap();
        assert!(matches!(
            identity.verify(&just_expired),
            Err(AppError::ExpiredCredential)
        ));
    }

    #[test]
    fn oversized_lifetime_is_clamped() {
        let identity = IdentityService::new("test-secret", i64::MAX);
        let token = identity.issue("user-1", "user").unwrap();
        assert_eq!(identity.verify(&token).unwrap().sub, "user-1");
    }
}
