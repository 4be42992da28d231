//! User Name Value Object
//!
//! The public handle a user logs in with. Input is NFKC-normalized and
//! trimmed; case is preserved.

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::error::{AuthError, AuthResult};

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> AuthResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let name = normalized.trim();

        if name.is_empty() {
            return Err(AuthError::Validation("Username is required".into()));
        }

        let len = name.chars().count();
        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&len) {
            return Err(AuthError::Validation(format!(
                "Username must be between {USER_NAME_MIN_LENGTH} and {USER_NAME_MAX_LENGTH} characters"
            )));
        }

        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AuthError::Validation(
                "Username cannot contain whitespace or control characters".into(),
            ));
        }

        // `@` marks an email at login
        if name.contains('@') {
            return Err(AuthError::Validation("Username cannot contain '@'".into()));
        }

        Ok(Self(name.to_string()))
    }

    /// Rebuild from a stored value
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
