//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{User, UserCredentials};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, LoginIdentifier, UserName, UserPassword, UserRole};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User, password_hash: &UserPassword) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                email,
                password_hash,
                user_role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.as_str())
        .bind(user.email.as_str())
        .bind(password_hash.as_phc_string())
        .bind(user.user_role.code())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Lost the race against a concurrent sign-up
            if is_unique_violation(&e) {
                AuthError::AlreadyExists
            } else {
                AuthError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                user_name,
                email,
                user_role,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_credentials(
        &self,
        identifier: &LoginIdentifier,
    ) -> AuthResult<Option<UserCredentials>> {
        let column = match identifier {
            LoginIdentifier::UserName(_) => "user_name",
            LoginIdentifier::Email(_) => "email",
        };
        let sql = format!(
            r#"
            SELECT
                user_id,
                user_name,
                email,
                user_role,
                created_at,
                updated_at,
                password_hash
            FROM users
            WHERE {column} = $1
            "#
        );

        let row = sqlx::query_as::<_, CredentialsRow>(&sql)
            .bind(identifier.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(CredentialsRow::into_credentials).transpose()
    }

    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1 OR email = $2)",
        )
        .bind(user_name.as_str())
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    email: String,
    user_role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.user_name),
            email: Email::from_db(self.email),
            user_role: self.user_role.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl CredentialsRow {
    fn into_credentials(self) -> AuthResult<UserCredentials> {
        Ok(UserCredentials {
            user: self.user.into_user()?,
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
        })
    }
}
