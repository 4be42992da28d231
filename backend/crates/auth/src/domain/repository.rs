//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in `infra`.

use kernel::error::app_error::AppError;
use kernel::id::UserId;

use crate::domain::entity::{User, UserCredentials};
use crate::domain::value_object::{Email, LoginIdentifier, UserName, UserPassword};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user with its password hash
    ///
    /// A duplicate username or email fails with `AuthError::AlreadyExists`.
    async fn create(&self, user: &User, password_hash: &UserPassword) -> AuthResult<()>;

    /// Find user by ID (never loads the password hash)
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Look up a user by username or email, including the password hash
    async fn find_credentials(
        &self,
        identifier: &LoginIdentifier,
    ) -> AuthResult<Option<UserCredentials>>;

    /// Check whether the username or the email is already registered
    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool>;
}

/// Creates the profile every new account starts with
///
/// Implemented by whichever crate owns profiles.
#[trait_variant::make(ProfileProvisioner: Send)]
pub trait LocalProfileProvisioner {
    async fn provision_profile(&self, owner: &UserId, name: &str) -> Result<(), AppError>;
}
