//! Credential Hasher
//!
//! Async façade over `platform::password::CredentialHasher`. Argon2 is
//! CPU-bound, so every call runs on the blocking pool.

use platform::password::CredentialHasher;

use crate::application::config::AuthConfig;
use crate::domain::value_object::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct PasswordService {
    hasher: CredentialHasher,
}

impl PasswordService {
    pub fn new(hasher: CredentialHasher) -> Self {
        Self { hasher }
    }

    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let hasher =
            CredentialHasher::with_memory(config.password_time_cost, config.password_memory_kib)
                .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(Self::new(hasher))
    }

    /// Hash a password with a fresh salt
    pub async fn hash(&self, password: RawPassword) -> AuthResult<UserPassword> {
        let hasher = self.hasher.clone();
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(password.inner()))
            .await?
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(UserPassword::from_hashed(hashed))
    }

    /// `false` on mismatch; errors only if the blocking task dies
    pub async fn verify(&self, password: RawPassword, stored: UserPassword) -> AuthResult<bool> {
        let hasher = self.hasher.clone();
        let matches =
            tokio::task::spawn_blocking(move || hasher.verify(password.inner(), stored.inner()))
                .await?;
        Ok(matches)
    }

    /// Spend the same work as a verification and discard the result
    ///
    /// Used when the login identifier is unknown, so response timing does
    /// not reveal whether an account exists.
    pub async fn burn(&self, password: RawPassword) {
        let hasher = self.hasher.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.hash(password.inner())).await;
    }
}
