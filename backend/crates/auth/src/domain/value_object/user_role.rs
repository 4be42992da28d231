use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(AuthError::Internal(format!("unknown user role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_user() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert!(!UserRole::default().is_admin());
    }

    #[test]
    fn test_code_roundtrip() {
        for role in [UserRole::User, UserRole::Admin] {
            assert_eq!(role.code().parse::<UserRole>().unwrap(), role);
        }
        assert!("moderator".parse::<UserRole>().is_err());
    }
}
