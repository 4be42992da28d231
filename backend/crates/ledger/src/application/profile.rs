//! Profile service

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::access::{Attribution, ensure_self};
use crate::domain::entity::Profile;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::ProfileName;
use crate::error::LedgerResult;

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub attribution: Attribution,
}

pub struct ProfileService<R> {
    repo: Arc<R>,
}

impl<R> ProfileService<R>
where
    R: ProfileRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, principal: UserId, input: NewProfile) -> LedgerResult<Profile> {
        let name = ProfileName::new(&input.name)?;
        let (owner, audit) = input.attribution.for_create(principal)?;

        let profile = Profile::new(owner, name, audit);
        self.repo.create_profile(&profile).await?;

        tracing::info!(
            profile_id = %profile.profile_id,
            user_id = %owner,
            "Profile created"
        );
        Ok(profile)
    }

    pub async fn list(&self, principal: UserId, user_id: UserId) -> LedgerResult<Vec<Profile>> {
        ensure_self(principal, user_id)?;
        self.repo.list_profiles(&user_id).await
    }
}
