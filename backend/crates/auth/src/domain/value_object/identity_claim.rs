//! Identity Claim
//!
//! The user attributes carried inside a session token. Two claims are equal
//! only when subject, username and email all match.

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaim {
    pub subject_id: UserId,
    pub username: String,
    pub email: String,
}

impl IdentityClaim {
    pub fn new(subject_id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            subject_id,
            username: username.into(),
            email: email.into(),
        }
    }
}
