//! Token Service
//!
//! Issues and verifies HS256 session tokens carrying an `IdentityClaim`.
//!
//! Expiry is checked against the injected `Clock` instead of inside
//! `jsonwebtoken`, so tests can expire a token without sleeping. Every
//! verification failure collapses to `AuthError::InvalidOrExpiredToken`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use platform::clock::{SharedClock, SystemClock};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::IdentityClaim;
use crate::error::{AuthError, AuthResult};

/// Wire form of the token payload
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    username: String,
    email: String,
    iat: i64,
    exp: i64,
}

impl TokenClaims {
    fn into_identity(self) -> Option<IdentityClaim> {
        let subject_id: UserId = self.sub.parse().ok()?;
        Some(IdentityClaim::new(subject_id, self.username, self.email))
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: SharedClock,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration, clock: SharedClock) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is compared against `clock` in `verify`
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }

    pub fn from_config(config: &AuthConfig, clock: SharedClock) -> Self {
        Self::new(&config.token_secret, config.token_ttl, clock)
    }

    /// Service on the system clock
    pub fn with_system_clock(config: &AuthConfig) -> Self {
        Self::from_config(config, Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `claim` with an expiry of now + ttl
    pub fn issue(&self, claim: &IdentityClaim) -> AuthResult<IssuedToken> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal(format!("token ttl {} overflows", self.ttl)))?;

        let claims = TokenClaims {
            sub: claim.subject_id.to_string(),
            username: claim.username.clone(),
            email: claim.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature and expiry, returning the embedded claim
    pub fn verify(&self, token: &str) -> AuthResult<IdentityClaim> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                tracing::debug!(error = %e, "Token failed decoding");
                AuthError::InvalidOrExpiredToken
            },
        )?;

        if self.clock.now().timestamp() >= data.claims.exp {
            tracing::debug!(exp = data.claims.exp, "Token expired");
            return Err(AuthError::InvalidOrExpiredToken);
        }

        data.claims
            .into_identity()
            .ok_or(AuthError::InvalidOrExpiredToken)
    }

    /// Read the claim WITHOUT checking signature or expiry
    ///
    /// Only for display and diagnostics. Never base an authorization
    /// decision on the result; use `verify` for that.
    pub fn decode_unverified(&self, token: &str) -> Option<IdentityClaim> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()?
            .claims
            .into_identity()
    }

    /// Expiry recorded in a token, without verification
    pub fn expires_at_unverified(&self, token: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
        Utc.timestamp_opt(data.claims.exp, 0).single()
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::clock::{Clock, ManualClock};

    fn claim() -> IdentityClaim {
        IdentityClaim::new(UserId::new(), "alice", "alice@x.com")
    }

    fn service_with_clock(secret: &[u8]) -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let service = TokenService::new(secret, Duration::days(1), clock.clone());
        (service, clock)
    }

    #[test]
    fn test_issue_then_verify() {
        let (service, _) = service_with_clock(b"secret-a");
        let claim = claim();

        let issued = service.issue(&claim).unwrap();
        assert_eq!(service.verify(&issued.token).unwrap(), claim);
    }

    #[test]
    fn test_expiry_uses_clock() {
        let (service, clock) = service_with_clock(b"secret-a");
        let issued = service.issue(&claim()).unwrap();

        clock.advance(Duration::hours(23));
        assert!(service.verify(&issued.token).is_ok());

        clock.advance(Duration::hours(1));
        assert!(matches!(
            service.verify(&issued.token),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_expires_at_matches_ttl() {
        let (service, clock) = service_with_clock(b"secret-a");
        let issued = service.issue(&claim()).unwrap();

        assert_eq!(issued.expires_at, clock.now() + Duration::days(1));
        assert_eq!(
            service.expires_at_unverified(&issued.token).map(|t| t.timestamp()),
            Some(issued.expires_at.timestamp())
        );
    }

    #[test]
    fn test_oversized_ttl_is_an_error() {
        let service = TokenService::new(
            b"secret-a",
            Duration::weeks(100_000_000),
            Arc::new(ManualClock::default()),
        );
        assert!(matches!(service.issue(&claim()), Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_other_secret_rejected() {
        let (issuer, _) = service_with_clock(b"secret-a");
        let (verifier, _) = service_with_clock(b"secret-b");

        let issued = issuer.issue(&claim()).unwrap();
        assert!(matches!(
            verifier.verify(&issued.token),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_malformed_and_tampered_rejected() {
        let (service, _) = service_with_clock(b"secret-a");
        for bad in ["", "not-a-token", "a.b.c"] {
            assert!(matches!(
                service.verify(bad),
                Err(AuthError::InvalidOrExpiredToken)
            ));
        }

        let issued = service.issue(&claim()).unwrap();
        let mut tampered = issued.token.clone();
        tampered.push('x');
        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn test_decode_unverified_ignores_signature() {
        let (issuer, _) = service_with_clock(b"secret-a");
        let (other, _) = service_with_clock(b"secret-b");
        let claim = claim();

        let issued = issuer.issue(&claim).unwrap();
        assert_eq!(other.decode_unverified(&issued.token), Some(claim));
        assert_eq!(other.decode_unverified("garbage"), None);
    }
}
