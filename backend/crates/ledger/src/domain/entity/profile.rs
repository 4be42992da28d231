use chrono::{DateTime, Utc};
use kernel::audit::AuditEnvelope;
use kernel::id::{ProfileId, UserId};

use super::Owned;
use crate::domain::value_object::ProfileName;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub profile_id: ProfileId,
    pub user_id: UserId,
    pub name: ProfileName,
    pub audit: AuditEnvelope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: UserId, name: ProfileName, audit: AuditEnvelope) -> Self {
        let now = Utc::now();
        Self {
            profile_id: ProfileId::new(),
            user_id,
            name,
            audit,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Owned for Profile {
    fn owner(&self) -> UserId {
        self.user_id
    }

    fn audit(&self) -> &AuditEnvelope {
        &self.audit
    }
}
