//! In-memory repositories
//!
//! Back the router tests and local experiments. Uniqueness rules match the
//! Postgres schema.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kernel::error::app_error::AppError;
use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::{User, UserCredentials};
use crate::domain::repository::{ProfileProvisioner, UserRepository};
use crate::domain::value_object::{Email, LoginIdentifier, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, UserCredentials>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User, password_hash: &UserPassword) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let taken = users.values().any(|c| {
            c.user.user_name == user.user_name || c.user.email == user.email
        });
        if taken || users.contains_key(&user.user_id) {
            return Err(AuthError::AlreadyExists);
        }

        users.insert(
            user.user_id,
            UserCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .get(user_id)
            .map(|c| c.user.clone()))
    }

    async fn find_credentials(
        &self,
        identifier: &LoginIdentifier,
    ) -> AuthResult<Option<UserCredentials>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|c| match identifier {
                LoginIdentifier::UserName(name) => c.user.user_name.as_str() == name,
                LoginIdentifier::Email(email) => c.user.email.as_str() == email,
            })
            .cloned())
    }

    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|c| &c.user.user_name == user_name || &c.user.email == email))
    }
}

/// Records provisioned profiles; can be told to fail
#[derive(Clone, Default)]
pub struct InMemoryProfileProvisioner {
    profiles: Arc<RwLock<Vec<(UserId, String)>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryProfileProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call fail
    pub fn fail_from_now_on(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub async fn profiles_of(&self, owner: &UserId) -> Vec<String> {
        self.profiles
            .read()
            .await
            .iter()
            .filter(|(user, _)| user == owner)
            .map(|(_, name)| name.clone())
            .collect()
    }

    pub async fn total(&self) -> usize {
        self.profiles.read().await.len()
    }
}

impl ProfileProvisioner for InMemoryProfileProvisioner {
    async fn provision_profile(&self, owner: &UserId, name: &str) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::service_unavailable("profile store unavailable"));
        }
        self.profiles.write().await.push((*owner, name.to_string()));
        Ok(())
    }
}
