//! Login Use Case
//!
//! Verifies credentials and issues a session token. Unknown identifiers and
//! wrong passwords fail with the same `InvalidCredentials`.

use std::sync::Arc;

use crate::application::password::PasswordService;
use crate::application::token::{IssuedToken, TokenService};
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{LoginIdentifier, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    /// Username or email
    pub identifier: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: IssuedToken,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    passwords: PasswordService,
    tokens: Arc<TokenService>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, passwords: PasswordService, tokens: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            passwords,
            tokens,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let identifier = input.identifier.trim();
        if identifier.is_empty() {
            return Err(AuthError::Validation("Username or email is required".into()));
        }
        let raw_password = RawPassword::for_login(input.password)?;

        let identifier = LoginIdentifier::parse(identifier);

        let Some(credentials) = self.user_repo.find_credentials(&identifier).await? else {
            self.passwords.burn(raw_password).await;
            tracing::warn!("Login failed: unknown identifier");
            return Err(AuthError::InvalidCredentials);
        };

        let user_id = credentials.user.user_id;
        if !self
            .passwords
            .verify(raw_password, credentials.password_hash)
            .await?
        {
            tracing::warn!(user_id = %user_id, "Login failed: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&credentials.user.identity_claim())?;

        tracing::info!(
            user_id = %user_id,
            expires_at = %token.expires_at,
            "User logged in"
        );

        Ok(LoginOutput {
            user: credentials.user,
            token,
        })
    }
}
