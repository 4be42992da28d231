//! PostgreSQL Repository Implementations

use auth::ProfileProvisioner;
use chrono::{DateTime, Utc};
use kernel::audit::AuditEnvelope;
use kernel::error::app_error::AppError;
use kernel::error::conversions::{is_foreign_key_violation, is_unique_violation};
use kernel::id::{CategoryId, ProfileId, TransactionId, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::{Category, Profile, Transaction};
use crate::domain::repository::{
    CategoryRepository, ProfileRepository, TransactionFilter, TransactionRepository,
};
use crate::domain::value_object::{Amount, CategoryName, ProfileName};
use crate::error::{LedgerError, LedgerResult};

/// PostgreSQL-backed profiles, categories and transactions
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn category_write_error(e: sqlx::Error) -> LedgerError {
    if is_unique_violation(&e) {
        LedgerError::Conflict("Category with this name already exists".into())
    } else {
        LedgerError::Database(e)
    }
}

// ============================================================================
// Profiles
// ============================================================================

impl ProfileRepository for PgLedgerRepository {
    async fn create_profile(&self, profile: &Profile) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                profile_id,
                user_id,
                name,
                created_by,
                updated_by,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(profile.profile_id.as_uuid())
        .bind(profile.user_id.as_uuid())
        .bind(profile.name.as_str())
        .bind(profile.audit.created_by.as_uuid())
        .bind(profile.audit.updated_by.as_uuid())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_profile(&self, profile_id: &ProfileId) -> LedgerResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT profile_id, user_id, name, created_by, updated_by, created_at, updated_at
            FROM profiles
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn list_profiles(&self, user_id: &UserId) -> LedgerResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT profile_id, user_id, name, created_by, updated_by, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProfileRow::into_profile).collect())
    }
}

impl ProfileProvisioner for PgLedgerRepository {
    async fn provision_profile(&self, owner: &UserId, name: &str) -> Result<(), AppError> {
        let name = ProfileName::new(name).map_err(|e| e.to_app_error())?;
        let profile = Profile::new(*owner, name, AuditEnvelope::created(*owner));
        self.create_profile(&profile)
            .await
            .map_err(|e| e.to_app_error())
    }
}

// ============================================================================
// Categories
// ============================================================================

impl CategoryRepository for PgLedgerRepository {
    async fn create_category(&self, category: &Category) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (
                category_id,
                user_id,
                name,
                description,
                created_by,
                updated_by,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(category.category_id.as_uuid())
        .bind(category.user_id.as_uuid())
        .bind(category.name.as_str())
        .bind(category.description.as_deref())
        .bind(category.audit.created_by.as_uuid())
        .bind(category.audit.updated_by.as_uuid())
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(category_write_error)?;

        Ok(())
    }

    async fn find_category(&self, category_id: &CategoryId) -> LedgerResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT
                category_id, user_id, name, description,
                created_by, updated_by, created_at, updated_at
            FROM categories
            WHERE category_id = $1
            "#,
        )
        .bind(category_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn list_categories(&self, user_id: &UserId) -> LedgerResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT
                category_id, user_id, name, description,
                created_by, updated_by, created_at, updated_at
            FROM categories
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    async fn update_category(&self, category: &Category) -> LedgerResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3, updated_by = $4, updated_at = $5
            WHERE category_id = $1
            "#,
        )
        .bind(category.category_id.as_uuid())
        .bind(category.name.as_str())
        .bind(category.description.as_deref())
        .bind(category.audit.updated_by.as_uuid())
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(category_write_error)?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound("Category"));
        }
        Ok(())
    }

    async fn delete_category(&self, category_id: &CategoryId) -> LedgerResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    LedgerError::Conflict("Category is still used by transactions".into())
                } else {
                    LedgerError::Database(e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Transactions
// ============================================================================

const TRANSACTION_SELECT: &str = r#"
    SELECT
        transaction_id, user_id, category_id, profile_id, amount,
        transaction_type, occurred_at, note,
        created_by, updated_by, created_at, updated_at
    FROM transactions
"#;

impl TransactionRepository for PgLedgerRepository {
    async fn create_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id,
                user_id,
                category_id,
                profile_id,
                amount,
                transaction_type,
                occurred_at,
                note,
                created_by,
                updated_by,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(transaction.transaction_id.as_uuid())
        .bind(transaction.user_id.as_uuid())
        .bind(transaction.category_id.as_uuid())
        .bind(transaction.profile_id.as_uuid())
        .bind(transaction.amount.value())
        .bind(transaction.kind.code())
        .bind(transaction.date)
        .bind(transaction.note.as_deref())
        .bind(transaction.audit.created_by.as_uuid())
        .bind(transaction.audit.updated_by.as_uuid())
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> LedgerResult<Option<Transaction>> {
        let mut query = QueryBuilder::<Postgres>::new(TRANSACTION_SELECT);
        query
            .push(" WHERE transaction_id = ")
            .push_bind(transaction_id.into_uuid());

        let row = query
            .build_query_as::<TransactionRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(TransactionRow::into_transaction).transpose()
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> LedgerResult<Vec<Transaction>> {
        let mut query = QueryBuilder::<Postgres>::new(TRANSACTION_SELECT);
        query
            .push(" WHERE user_id = ")
            .push_bind(filter.user_id.into_uuid());
        if let Some(category_id) = filter.category_id {
            query
                .push(" AND category_id = ")
                .push_bind(category_id.into_uuid());
        }
        if let Some(kind) = filter.kind {
            query.push(" AND transaction_type = ").push_bind(kind.code());
        }
        if let Some(from) = filter.from {
            query.push(" AND occurred_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND occurred_at <= ").push_bind(to);
        }
        query.push(" ORDER BY occurred_at DESC, created_at DESC");

        let rows = query
            .build_query_as::<TransactionRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(TransactionRow::into_transaction)
            .collect()
    }

    async fn update_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET
                category_id = $2,
                profile_id = $3,
                amount = $4,
                transaction_type = $5,
                occurred_at = $6,
                note = $7,
                updated_by = $8,
                updated_at = $9
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction.transaction_id.as_uuid())
        .bind(transaction.category_id.as_uuid())
        .bind(transaction.profile_id.as_uuid())
        .bind(transaction.amount.value())
        .bind(transaction.kind.code())
        .bind(transaction.date)
        .bind(transaction.note.as_deref())
        .bind(transaction.audit.updated_by.as_uuid())
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound("Transaction"));
        }
        Ok(())
    }

    async fn delete_transaction(&self, transaction_id: &TransactionId) -> LedgerResult<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE transaction_id = $1")
            .bind(transaction_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AuditColumns {
    created_by: Uuid,
    updated_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AuditColumns {
    fn envelope(&self) -> AuditEnvelope {
        AuditEnvelope {
            created_by: UserId::from_uuid(self.created_by),
            updated_by: UserId::from_uuid(self.updated_by),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    profile_id: Uuid,
    user_id: Uuid,
    name: String,
    #[sqlx(flatten)]
    audit: AuditColumns,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            profile_id: ProfileId::from_uuid(self.profile_id),
            user_id: UserId::from_uuid(self.user_id),
            name: ProfileName::from_db(self.name),
            audit: self.audit.envelope(),
            created_at: self.audit.created_at,
            updated_at: self.audit.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category_id: Uuid,
    user_id: Uuid,
    name: String,
    description: Option<String>,
    #[sqlx(flatten)]
    audit: AuditColumns,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            category_id: CategoryId::from_uuid(self.category_id),
            user_id: UserId::from_uuid(self.user_id),
            name: CategoryName::from_db(self.name),
            description: self.description,
            audit: self.audit.envelope(),
            created_at: self.audit.created_at,
            updated_at: self.audit.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    transaction_id: Uuid,
    user_id: Uuid,
    category_id: Uuid,
    profile_id: Uuid,
    amount: f64,
    transaction_type: String,
    occurred_at: DateTime<Utc>,
    note: Option<String>,
    #[sqlx(flatten)]
    audit: AuditColumns,
}

impl TransactionRow {
    fn into_transaction(self) -> LedgerResult<Transaction> {
        let kind = self.transaction_type.parse().map_err(|_| {
            LedgerError::Internal(format!(
                "unknown transaction type in database: {}",
                self.transaction_type
            ))
        })?;

        Ok(Transaction {
            transaction_id: TransactionId::from_uuid(self.transaction_id),
            user_id: UserId::from_uuid(self.user_id),
            category_id: CategoryId::from_uuid(self.category_id),
            profile_id: ProfileId::from_uuid(self.profile_id),
            amount: Amount::from_db(self.amount),
            kind,
            date: self.occurred_at,
            note: self.note,
            audit: self.audit.envelope(),
            created_at: self.audit.created_at,
            updated_at: self.audit.updated_at,
        })
    }
}
