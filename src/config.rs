use std::env;

use anyhow::{Context, bail};

use crate::services::identity_service::MAX_LIFETIME_HOURS;

/// `DATABASE_URL` prefix selecting the in-process store, e.g. `memory://`.
pub const MEMORY_STORE_SCHEME: &str = "memory:";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_name: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub cors_origins: Vec<String>,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let db_name = env::var("DB_NAME").unwrap_or_else(|_| "food_ordering".to_string());
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let jwt_expiration_hours =
            parse_expiration_hours(env::var("JWT_EXPIRATION_HOURS").ok().as_deref())?;
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            database_url,
            db_name,
            jwt_secret,
            jwt_expiration_hours,
            cors_origins,
            host,
            port,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_STORE_SCHEME)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Unset means 24 hours. Anything else must be an integer in
/// `1..=MAX_LIFETIME_HOURS`.
fn parse_expiration_hours(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(24);
    };
    let hours = raw
        .parse::<i64>()
        .with_context(|| format!("JWT_EXPIRATION_HOURS is not an integer: {raw}"))?;
    if !(1..=MAX_LIFETIME_HOURS).contains(&hours) {
        bail!("JWT_EXPIRATION_HOURS must be between 1 and {MAX_LIFETIME_HOURS}, got {hours}");
    }
    Ok(hours)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
