//! Application Configuration
//!
//! Plain settings handed in by the binary; this crate never reads the
//! environment itself.

use chrono::Duration;
use platform::cookie::CookieConfig;
use platform::password::{DEFAULT_MEMORY_KIB, DEFAULT_TIME_COST};
use std::{fmt, str::FromStr};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// How the session token travels between client and server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// HTTP-only `token` cookie
    #[default]
    Cookie,
    /// `Authorization: Bearer <token>`
    Header,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Cookie => "cookie",
            TransportMode::Header => "header",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cookie" => Ok(TransportMode::Cookie),
            "header" | "bearer" => Ok(TransportMode::Header),
            other => Err(format!("unknown auth transport: {other}")),
        }
    }
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens
    pub token_secret: Vec<u8>,
    /// Token lifetime; the cookie Max-Age follows it
    pub token_ttl: Duration,
    pub transport: TransportMode,
    /// Whether to set the Secure cookie attribute
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Argon2id iterations
    pub password_time_cost: u32,
    /// Argon2id memory in KiB
    pub password_memory_kib: u32,
}

impl AuthConfig {
    /// Production defaults around the given signing secret
    pub fn new(token_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            transport: TransportMode::default(),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            password_time_cost: DEFAULT_TIME_COST,
            password_memory_kib: DEFAULT_MEMORY_KIB,
        }
    }

    /// Config with a random per-process secret
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::new(secret.to_vec())
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Cookie attributes for the token cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            same_site: self.cookie_same_site,
            ..CookieConfig::for_token(self.cookie_secure, self.token_ttl.num_seconds())
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("transport", &self.transport)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("password_time_cost", &self.password_time_cost)
            .field("password_memory_kib", &self.password_memory_kib)
            .finish()
    }
}
