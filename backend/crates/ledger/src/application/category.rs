//! Category service

use std::sync::Arc;

use kernel::id::{CategoryId, UserId};

use crate::application::access::{Attribution, ensure_access, ensure_self};
use crate::domain::entity::{Category, CategoryChanges};
use crate::domain::repository::CategoryRepository;
use crate::domain::value_object::{CategoryName, description};
use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub attribution: Attribution,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub attribution: Attribution,
}

pub struct CategoryService<R> {
    repo: Arc<R>,
}

impl<R> CategoryService<R>
where
    R: CategoryRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, principal: UserId, input: NewCategory) -> LedgerResult<Category> {
        let name = CategoryName::new(&input.name)?;
        let description = description(input.description)?;
        let (owner, audit) = input.attribution.for_create(principal)?;

        let category = Category::new(owner, name, description, audit);
        self.repo.create_category(&category).await?;

        tracing::info!(
            category_id = %category.category_id,
            user_id = %owner,
            "Category created"
        );
        Ok(category)
    }

    pub async fn get(&self, principal: UserId, category_id: CategoryId) -> LedgerResult<Category> {
        let category = self
            .repo
            .find_category(&category_id)
            .await?
            .ok_or(LedgerError::NotFound("Category"))?;
        ensure_access(&category, principal)?;
        Ok(category)
    }

    pub async fn list(&self, principal: UserId, user_id: UserId) -> LedgerResult<Vec<Category>> {
        ensure_self(principal, user_id)?;
        self.repo.list_categories(&user_id).await
    }

    pub async fn update(
        &self,
        principal: UserId,
        category_id: CategoryId,
        input: CategoryUpdate,
    ) -> LedgerResult<Category> {
        let changes = CategoryChanges {
            name: input.name.as_deref().map(CategoryName::new).transpose()?,
            description: description(input.description)?,
        };
        let modifier = input.attribution.for_update(principal)?;

        let mut category = self.get(principal, category_id).await?;
        category.apply(changes, modifier);
        self.repo.update_category(&category).await?;

        tracing::info!(category_id = %category_id, updated_by = %modifier, "Category updated");
        Ok(category)
    }

    pub async fn delete(&self, principal: UserId, category_id: CategoryId) -> LedgerResult<()> {
        self.get(principal, category_id).await?;
        if !self.repo.delete_category(&category_id).await? {
            return Err(LedgerError::NotFound("Category"));
        }

        tracing::info!(category_id = %category_id, deleted_by = %principal, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryLedgerRepository;

    fn service() -> CategoryService<InMemoryLedgerRepository> {
        CategoryService::new(Arc::new(InMemoryLedgerRepository::new()))
    }

    fn food() -> NewCategory {
        NewCategory {
            name: "Food".into(),
            description: Some("Groceries and eating out".into()),
            attribution: Attribution::default(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts_per_owner() {
        let service = service();
        let alice = UserId::new();
        let bob = UserId::new();

        service.create(alice, food()).await.unwrap();
        assert!(matches!(
            service.create(alice, food()).await,
            Err(LedgerError::Conflict(_))
        ));
        // Another owner may reuse the name
        assert!(service.create(bob, food()).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_checks_access() {
        let service = service();
        let alice = UserId::new();
        let category = service.create(alice, food()).await.unwrap();

        assert_eq!(
            service.get(alice, category.category_id).await.unwrap(),
            category
        );
        assert!(matches!(
            service.get(UserId::new(), category.category_id).await,
            Err(LedgerError::Forbidden(_))
        ));
        assert!(matches!(
            service.get(alice, CategoryId::new()).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_touches_updated_by_only() {
        let service = service();
        let alice = UserId::new();
        let category = service.create(alice, food()).await.unwrap();

        let updated = service
            .update(
                alice,
                category.category_id,
                CategoryUpdate {
                    name: Some("Dining".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_str(), "Dining");
        assert_eq!(updated.description, category.description);
        assert_eq!(updated.audit.created_by, alice);
        assert_eq!(updated.user_id, alice);
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        let alice = UserId::new();
        let category = service.create(alice, food()).await.unwrap();

        assert!(matches!(
            service.delete(UserId::new(), category.category_id).await,
            Err(LedgerError::Forbidden(_))
        ));
        service.delete(alice, category.category_id).await.unwrap();
        assert!(matches!(
            service.get(alice, category.category_id).await,
            Err(LedgerError::NotFound(_))
        ));
    }
}
