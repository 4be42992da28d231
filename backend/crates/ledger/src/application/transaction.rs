//! Transaction service
//!
//! A transaction must point at a category and a profile that belong to
//! its owner. When a create omits `profileId`, the owner's default
//! profile is used.

use std::sync::Arc;

use auth::application::sign_up::DEFAULT_PROFILE_NAME;
use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, ProfileId, TransactionId, UserId};

use crate::application::access::{Attribution, ensure_access, ensure_self};
use crate::domain::entity::{Transaction, TransactionChanges};
use crate::domain::repository::{
    CategoryRepository, ProfileRepository, TransactionFilter, TransactionRepository,
};
use crate::domain::value_object::{Amount, TransactionType, note};
use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: f64,
    pub kind: TransactionType,
    pub category_id: CategoryId,
    pub profile_id: Option<ProfileId>,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub attribution: Attribution,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub amount: Option<f64>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub profile_id: Option<ProfileId>,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub attribution: Attribution,
}

pub struct TransactionService<R> {
    repo: Arc<R>,
}

impl<R> TransactionService<R>
where
    R: TransactionRepository + CategoryRepository + ProfileRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        principal: UserId,
        input: NewTransaction,
    ) -> LedgerResult<Transaction> {
        let amount = Amount::new(input.amount)?;
        let note = note(input.note)?;
        let (owner, audit) = input.attribution.for_create(principal)?;

        self.check_category(owner, input.category_id).await?;
        let profile_id = match input.profile_id {
            Some(profile_id) => {
                self.check_profile(owner, profile_id).await?;
                profile_id
            }
            None => self.default_profile(owner).await?,
        };

        let transaction = Transaction::new(
            owner,
            input.category_id,
            profile_id,
            amount,
            input.kind,
            input.date,
            note,
            audit,
        );
        self.repo.create_transaction(&transaction).await?;

        tracing::info!(
            transaction_id = %transaction.transaction_id,
            user_id = %owner,
            kind = %transaction.kind,
            "Transaction created"
        );
        Ok(transaction)
    }

    pub async fn get(
        &self,
        principal: UserId,
        transaction_id: TransactionId,
    ) -> LedgerResult<Transaction> {
        let transaction = self
            .repo
            .find_transaction(&transaction_id)
            .await?
            .ok_or(LedgerError::NotFound("Transaction"))?;
        ensure_access(&transaction, principal)?;
        Ok(transaction)
    }

    /// Transactions matching `filter`, newest first
    pub async fn list(
        &self,
        principal: UserId,
        filter: TransactionFilter,
    ) -> LedgerResult<Vec<Transaction>> {
        ensure_self(principal, filter.user_id)?;
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(LedgerError::Validation(
                    "startDate must not be after endDate".into(),
                ));
            }
        }
        self.repo.list_transactions(&filter).await
    }

    pub async fn update(
        &self,
        principal: UserId,
        transaction_id: TransactionId,
        input: TransactionUpdate,
    ) -> LedgerResult<Transaction> {
        let changes = TransactionChanges {
            amount: input.amount.map(Amount::new).transpose()?,
            kind: input.kind,
            category_id: input.category_id,
            profile_id: input.profile_id,
            date: input.date,
            note: note(input.note)?,
        };
        let modifier = input.attribution.for_update(principal)?;

        let mut transaction = self.get(principal, transaction_id).await?;
        if let Some(category_id) = changes.category_id {
            self.check_category(transaction.user_id, category_id).await?;
        }
        if let Some(profile_id) = changes.profile_id {
            self.check_profile(transaction.user_id, profile_id).await?;
        }

        transaction.apply(changes, modifier);
        self.repo.update_transaction(&transaction).await?;

        tracing::info!(
            transaction_id = %transaction_id,
            updated_by = %modifier,
            "Transaction updated"
        );
        Ok(transaction)
    }

    pub async fn delete(&self, principal: UserId, transaction_id: TransactionId) -> LedgerResult<()> {
        self.get(principal, transaction_id).await?;
        if !self.repo.delete_transaction(&transaction_id).await? {
            return Err(LedgerError::NotFound("Transaction"));
        }

        tracing::info!(
            transaction_id = %transaction_id,
            deleted_by = %principal,
            "Transaction deleted"
        );
        Ok(())
    }

    async fn check_category(&self, owner: UserId, category_id: CategoryId) -> LedgerResult<()> {
        match self.repo.find_category(&category_id).await? {
            Some(category) if category.user_id == owner => Ok(()),
            _ => Err(LedgerError::Validation(format!(
                "Category {category_id} does not exist"
            ))),
        }
    }

    async fn check_profile(&self, owner: UserId, profile_id: ProfileId) -> LedgerResult<()> {
        match self.repo.find_profile(&profile_id).await? {
            Some(profile) if profile.user_id == owner => Ok(()),
            _ => Err(LedgerError::Validation(format!(
                "Profile {profile_id} does not exist"
            ))),
        }
    }

    /// The profile provisioned at sign-up, else the oldest one
    async fn default_profile(&self, owner: UserId) -> LedgerResult<ProfileId> {
        let profiles = self.repo.list_profiles(&owner).await?;
        profiles
            .iter()
            .find(|p| p.name.as_str() == DEFAULT_PROFILE_NAME)
            .or_else(|| profiles.first())
            .map(|p| p.profile_id)
            .ok_or_else(|| LedgerError::Validation("profileId is required".into()))
    }
}
