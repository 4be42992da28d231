//! Sign Up Use Case
//!
//! Creates a new account and provisions its default profile.

use std::sync::Arc;

use crate::application::password::PasswordService;
use crate::domain::entity::User;
use crate::domain::repository::{ProfileProvisioner, UserRepository};
use crate::domain::value_object::{Email, RawPassword, UserName, UserRole};
use crate::error::{AuthError, AuthResult};

/// Name of the profile every account starts with
pub const DEFAULT_PROFILE_NAME: &str = "self";

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    /// Elevated role; `None` means `UserRole::User`
    pub role: Option<UserRole>,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user: User,
    /// False when the default profile could not be created
    pub profile_provisioned: bool,
}

/// Sign up use case
pub struct SignUpUseCase<U, P>
where
    U: UserRepository,
    P: ProfileProvisioner,
{
    user_repo: Arc<U>,
    profiles: Arc<P>,
    passwords: PasswordService,
}

impl<U, P> SignUpUseCase<U, P>
where
    U: UserRepository,
    P: ProfileProvisioner,
{
    pub fn new(user_repo: Arc<U>, profiles: Arc<P>, passwords: PasswordService) -> Self {
        Self {
            user_repo,
            profiles,
            passwords,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let user_name = UserName::new(&input.user_name)?;
        let email = Email::new(input.email)?;
        let raw_password = RawPassword::new(input.password)?;

        if self
            .user_repo
            .exists_by_user_name_or_email(&user_name, &email)
            .await?
        {
            tracing::info!(user_name = %user_name, "Sign-up rejected: username or email taken");
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.passwords.hash(raw_password).await?;

        let user = User::new(user_name, email, input.role.unwrap_or_default());
        self.user_repo.create(&user, &password_hash).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            user_role = %user.user_role,
            "User signed up"
        );

        // Provisioning failure never fails the sign-up.
        let profile_provisioned = match self
            .profiles
            .provision_profile(&user.user_id, DEFAULT_PROFILE_NAME)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    user_id = %user.user_id,
                    error = %e,
                    "Default profile provisioning failed"
                );
                false
            }
        };

        Ok(SignUpOutput {
            user,
            profile_provisioned,
        })
    }
}
