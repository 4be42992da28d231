//! User Password Value Objects
//!
//! `RawPassword` is what the user typed; `UserPassword` is the stored
//! Argon2id hash. Hashing itself lives in
//! `application::password::PasswordService` so it can run off the async
//! runtime.

use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Password as submitted by a client; zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a password chosen at sign-up
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(policy_error)
    }

    /// Accept a password presented at login (only blank input is refused)
    pub fn for_login(raw: String) -> AuthResult<Self> {
        ClearTextPassword::for_verification(raw)
            .map(Self)
            .map_err(policy_error)
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

fn policy_error(err: PasswordPolicyError) -> AuthError {
    let message = match err {
        PasswordPolicyError::TooShort { min, .. } => {
            format!("Password must be at least {min} characters")
        }
        PasswordPolicyError::TooLong { max, .. } => {
            format!("Password must be at most {max} characters")
        }
        PasswordPolicyError::EmptyOrWhitespace => "Password is required".to_string(),
        PasswordPolicyError::InvalidCharacter => {
            "Password contains invalid characters".to_string()
        }
        PasswordPolicyError::CommonPattern => {
            "Password is too common, please choose another one".to_string()
        }
    };
    AuthError::Validation(message)
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Stored password hash (PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub(crate) fn from_hashed(hashed: HashedPassword) -> Self {
        Self(hashed)
    }

    /// Load a hash read back from the database
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| AuthError::Internal("Invalid password hash in database".into()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub(crate) fn inner(&self) -> &HashedPassword {
        &self.0
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}
