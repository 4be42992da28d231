use chrono::{DateTime, Utc};
use kernel::audit::AuditEnvelope;
use kernel::id::{CategoryId, UserId};

use super::Owned;
use crate::domain::value_object::CategoryName;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub category_id: CategoryId,
    pub user_id: UserId,
    pub name: CategoryName,
    pub description: Option<String>,
    pub audit: AuditEnvelope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated partial update; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<CategoryName>,
    pub description: Option<String>,
}

impl Category {
    pub fn new(
        user_id: UserId,
        name: CategoryName,
        description: Option<String>,
        audit: AuditEnvelope,
    ) -> Self {
        let now = Utc::now();
        Self {
            category_id: CategoryId::new(),
            user_id,
            name,
            description,
            audit,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: CategoryChanges, by: UserId) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        self.audit.touch(by);
        self.updated_at = Utc::now();
    }
}

impl Owned for Category {
    fn owner(&self) -> UserId {
        self.user_id
    }

    fn audit(&self) -> &AuditEnvelope {
        &self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_creator_and_owner() {
        let owner = UserId::new();
        let editor = UserId::new();
        let mut category = Category::new(
            owner,
            CategoryName::new("Food").unwrap(),
            None,
            AuditEnvelope::created(owner),
        );

        category.apply(
            CategoryChanges {
                name: Some(CategoryName::new("Groceries").unwrap()),
                description: None,
            },
            editor,
        );

        assert_eq!(category.name.as_str(), "Groceries");
        assert_eq!(category.user_id, owner);
        assert_eq!(category.audit.created_by, owner);
        assert_eq!(category.audit.updated_by, editor);
        assert!(category.updated_at >= category.created_at);
    }

    #[test]
    fn test_access_by_owner_or_creator() {
        let owner = UserId::new();
        let creator = UserId::new();
        let category = Category::new(
            owner,
            CategoryName::new("Rent").unwrap(),
            None,
            AuditEnvelope::created(creator),
        );

        assert!(category.is_accessible_by(owner));
        assert!(category.is_accessible_by(creator));
        assert!(!category.is_accessible_by(UserId::new()));
    }
}
