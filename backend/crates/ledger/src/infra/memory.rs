//! In-memory ledger repository
//!
//! Mirrors the Postgres constraints: unique category names per owner and
//! categories that cannot be deleted while transactions use them.

use std::collections::HashMap;
use std::sync::Arc;

use auth::ProfileProvisioner;
use kernel::audit::AuditEnvelope;
use kernel::error::app_error::AppError;
use kernel::id::{CategoryId, ProfileId, TransactionId, UserId};
use tokio::sync::RwLock;

use crate::domain::entity::{Category, Profile, Transaction};
use crate::domain::repository::{
    CategoryRepository, ProfileRepository, TransactionFilter, TransactionRepository,
};
use crate::domain::value_object::ProfileName;
use crate::error::{LedgerError, LedgerResult};

#[derive(Default)]
struct Tables {
    profiles: HashMap<ProfileId, Profile>,
    categories: HashMap<CategoryId, Category>,
    transactions: HashMap<TransactionId, Transaction>,
}

impl Tables {
    fn name_taken(&self, category: &Category) -> bool {
        self.categories.values().any(|c| {
            c.category_id != category.category_id
                && c.user_id == category.user_id
                && c.name == category.name
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryLedgerRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_category() -> LedgerError {
    LedgerError::Conflict("Category with this name already exists".into())
}

impl ProfileRepository for InMemoryLedgerRepository {
    async fn create_profile(&self, profile: &Profile) -> LedgerResult<()> {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.profile_id, profile.clone());
        Ok(())
    }

    async fn find_profile(&self, profile_id: &ProfileId) -> LedgerResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(profile_id).cloned())
    }

    async fn list_profiles(&self, user_id: &UserId) -> LedgerResult<Vec<Profile>> {
        let mut profiles: Vec<_> = self
            .tables
            .read()
            .await
            .profiles
            .values()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect();
        profiles.sort_by_key(|p| p.created_at);
        Ok(profiles)
    }
}

impl CategoryRepository for InMemoryLedgerRepository {
    async fn create_category(&self, category: &Category) -> LedgerResult<()> {
        let mut tables = self.tables.write().await;
        if tables.name_taken(category) {
            return Err(duplicate_category());
        }
        tables
            .categories
            .insert(category.category_id, category.clone());
        Ok(())
    }

    async fn find_category(&self, category_id: &CategoryId) -> LedgerResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(category_id).cloned())
    }

    async fn list_categories(&self, user_id: &UserId) -> LedgerResult<Vec<Category>> {
        let mut categories: Vec<_> = self
            .tables
            .read()
            .await
            .categories
            .values()
            .filter(|c| &c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(categories)
    }

    async fn update_category(&self, category: &Category) -> LedgerResult<()> {
        let mut tables = self.tables.write().await;
        if tables.name_taken(category) {
            return Err(duplicate_category());
        }
        match tables.categories.get_mut(&category.category_id) {
            Some(stored) => {
                *stored = category.clone();
                Ok(())
            }
            None => Err(LedgerError::NotFound("Category")),
        }
    }

    async fn delete_category(&self, category_id: &CategoryId) -> LedgerResult<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .transactions
            .values()
            .any(|t| &t.category_id == category_id)
        {
            return Err(LedgerError::Conflict(
                "Category is still used by transactions".into(),
            ));
        }
        Ok(tables.categories.remove(category_id).is_some())
    }
}

impl TransactionRepository for InMemoryLedgerRepository {
    async fn create_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        self.tables
            .write()
            .await
            .transactions
            .insert(transaction.transaction_id, transaction.clone());
        Ok(())
    }

    async fn find_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> LedgerResult<Option<Transaction>> {
        Ok(self
            .tables
            .read()
            .await
            .transactions
            .get(transaction_id)
            .cloned())
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> LedgerResult<Vec<Transaction>> {
        let mut transactions: Vec<_> = self
            .tables
            .read()
            .await
            .transactions
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(transactions)
    }

    async fn update_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        match self
            .tables
            .write()
            .await
            .transactions
            .get_mut(&transaction.transaction_id)
        {
            Some(stored) => {
                *stored = transaction.clone();
                Ok(())
            }
            None => Err(LedgerError::NotFound("Transaction")),
        }
    }

    async fn delete_transaction(&self, transaction_id: &TransactionId) -> LedgerResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .transactions
            .remove(transaction_id)
            .is_some())
    }
}

impl ProfileProvisioner for InMemoryLedgerRepository {
    async fn provision_profile(&self, owner: &UserId, name: &str) -> Result<(), AppError> {
        let name = ProfileName::new(name).map_err(|e| e.to_app_error())?;
        let profile = Profile::new(*owner, name, AuditEnvelope::created(*owner));
        self.create_profile(&profile)
            .await
            .map_err(|e| e.to_app_error())
    }
}
