//! User Entity
//!
//! Account data safe to hand to the presentation layer. The password hash
//! travels separately in `UserCredentials`, which only the login path reads.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    Email, IdentityClaim, UserName, UserPassword, UserRole,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    /// Unique login handle
    pub user_name: UserName,
    /// Unique, lower-cased
    pub email: Email,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_name: UserName, email: Email, user_role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            email,
            user_role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Claim embedded in this user's session tokens
    pub fn identity_claim(&self) -> IdentityClaim {
        IdentityClaim::new(self.user_id, self.user_name.as_str(), self.email.as_str())
    }
}

/// A user together with the stored password hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: UserPassword,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_claim() {
        let user = User::new(
            UserName::new("alice").unwrap(),
            Email::new("Alice@X.com").unwrap(),
            UserRole::default(),
        );

        let claim = user.identity_claim();
        assert_eq!(claim.subject_id, user.user_id);
        assert_eq!(claim.username, "alice");
        assert_eq!(claim.email, "alice@x.com");
        assert_eq!(user.user_role, UserRole::User);
        assert_eq!(user.created_at, user.updated_at);
    }
}
