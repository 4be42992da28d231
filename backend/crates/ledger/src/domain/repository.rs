//! Repository Traits
//!
//! Interfaces for ledger persistence. Implementations live in `infra`.

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, ProfileId, TransactionId, UserId};

use crate::domain::entity::{Category, Profile, Transaction};
use crate::domain::value_object::TransactionType;
use crate::error::LedgerResult;

#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    async fn create_profile(&self, profile: &Profile) -> LedgerResult<()>;

    async fn find_profile(&self, profile_id: &ProfileId) -> LedgerResult<Option<Profile>>;

    /// Profiles of `user_id`, oldest first
    async fn list_profiles(&self, user_id: &UserId) -> LedgerResult<Vec<Profile>>;
}

#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    /// A duplicate `(user_id, name)` fails with `LedgerError::Conflict`
    async fn create_category(&self, category: &Category) -> LedgerResult<()>;

    async fn find_category(&self, category_id: &CategoryId) -> LedgerResult<Option<Category>>;

    /// Categories of `user_id`, by name
    async fn list_categories(&self, user_id: &UserId) -> LedgerResult<Vec<Category>>;

    /// Persist a modified category; same uniqueness rule as create
    async fn update_category(&self, category: &Category) -> LedgerResult<()>;

    /// Returns false when nothing was deleted; a category still used by
    /// transactions fails with `LedgerError::Conflict`
    async fn delete_category(&self, category_id: &CategoryId) -> LedgerResult<bool>;
}

#[trait_variant::make(TransactionRepository: Send)]
pub trait LocalTransactionRepository {
    async fn create_transaction(&self, transaction: &Transaction) -> LedgerResult<()>;

    async fn find_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> LedgerResult<Option<Transaction>>;

    /// Matching transactions, newest `date` first
    async fn list_transactions(&self, filter: &TransactionFilter)
    -> LedgerResult<Vec<Transaction>>;

    async fn update_transaction(&self, transaction: &Transaction) -> LedgerResult<()>;

    async fn delete_transaction(&self, transaction_id: &TransactionId) -> LedgerResult<bool>;
}

/// Query for a user's transactions
///
/// Date bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
    pub kind: Option<TransactionType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            category_id: None,
            kind: None,
            from: None,
            to: None,
        }
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        transaction.user_id == self.user_id
            && self.category_id.is_none_or(|c| transaction.category_id == c)
            && self.kind.is_none_or(|k| transaction.kind == k)
            && self.from.is_none_or(|from| transaction.date >= from)
            && self.to.is_none_or(|to| transaction.date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::Amount;
    use chrono::Duration;
    use kernel::audit::AuditEnvelope;

    fn transaction(user: UserId, kind: TransactionType, date: DateTime<Utc>) -> Transaction {
        Transaction::new(
            user,
            CategoryId::new(),
            ProfileId::new(),
            Amount::new(10.0).unwrap(),
            kind,
            Some(date),
            None,
            AuditEnvelope::created(user),
        )
    }

    #[test]
    fn test_filter_by_user_and_kind() {
        let user = UserId::new();
        let now = Utc::now();
        let debit = transaction(user, TransactionType::Debit, now);
        let other = transaction(UserId::new(), TransactionType::Debit, now);

        let filter = TransactionFilter::for_user(user).kind(TransactionType::Debit);
        assert!(filter.matches(&debit));
        assert!(!filter.matches(&other));
        assert!(!TransactionFilter::for_user(user)
            .kind(TransactionType::Credit)
            .matches(&debit));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let user = UserId::new();
        let start = Utc::now();
        let end = start + Duration::days(7);
        let filter = TransactionFilter::for_user(user).between(start, end);

        assert!(filter.matches(&transaction(user, TransactionType::Credit, start)));
        assert!(filter.matches(&transaction(user, TransactionType::Credit, end)));
        assert!(!filter.matches(&transaction(
            user,
            TransactionType::Credit,
            end + Duration::seconds(1)
        )));
    }
}
