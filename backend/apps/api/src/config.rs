//! Server configuration
//!
//! Read once from the environment at startup. Library crates only ever
//! see the resulting plain structs.

use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, bail};
use auth::{AuthConfig, TransportMode};
use platform::duration::parse_duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TOKEN_LIFETIME: &str = "1d";
/// Longest accepted `JWT_EXPIRE`, in days
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 365;
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            other => bail!("APP_ENV must be development or production, got {other:?}"),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnv::Development => f.write_str("development"),
            AppEnv::Production => f.write_str("production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub env: AppEnv,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub frontend_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env: AppEnv = var("APP_ENV").as_deref().unwrap_or("development").parse()?;

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port:?}"))?,
            None => DEFAULT_PORT,
        };

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let mut auth = match (var("JWT_SECRET"), env) {
            (Some(secret), _) => AuthConfig::new(secret.into_bytes()),
            (None, AppEnv::Production) => bail!("JWT_SECRET must be set in production"),
            (None, AppEnv::Development) => {
                tracing::warn!("JWT_SECRET not set, using a random per-process secret");
                AuthConfig::with_random_secret()
            }
        };
        auth.cookie_secure = env == AppEnv::Production;

        let lifetime = var("JWT_EXPIRE").unwrap_or_else(|| DEFAULT_TOKEN_LIFETIME.to_string());
        auth.token_ttl = parse_duration(&lifetime)
            .with_context(|| format!("JWT_EXPIRE is not a valid duration: {lifetime:?}"))?;
        let ttl_secs = auth.token_ttl.num_seconds();
        if ttl_secs <= 0 || ttl_secs > MAX_TOKEN_LIFETIME_DAYS * 86_400 {
            bail!("JWT_EXPIRE must be positive and at most {MAX_TOKEN_LIFETIME_DAYS} days");
        }

        if let Some(cost) = var("PASSWORD_HASH_COST") {
            let cost: u32 = cost
                .trim()
                .parse()
                .with_context(|| format!("PASSWORD_HASH_COST is not a number: {cost:?}"))?;
            if cost == 0 {
                bail!("PASSWORD_HASH_COST must be at least 1");
            }
            auth.password_time_cost = cost;
        }

        if let Some(mode) = var("AUTH_TRANSPORT") {
            auth.transport = mode
                .parse::<TransportMode>()
                .map_err(|e| anyhow::anyhow!("AUTH_TRANSPORT: {e}"))?;
        }

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            env,
            port,
            database_url,
            auth,
            frontend_origins,
        })
    }
}
