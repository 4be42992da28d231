//! Request / Response DTOs

use chrono::{DateTime, Utc};
use kernel::audit::AuditEnvelope;
use kernel::id::{CategoryId, ProfileId, TransactionId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::{
    Attribution, CategoryUpdate, NewCategory, NewProfile, NewTransaction, TransactionUpdate,
};
use crate::domain::entity::{Category, Profile, Transaction};
use crate::domain::value_object::TransactionType;

/// Fields stamped into mutating bodies by the audit attributor
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    pub user_id: Option<UserId>,
    pub created_by: Option<UserId>,
    pub updated_by: Option<UserId>,
}

impl From<AuditFields> for Attribution {
    fn from(fields: AuditFields) -> Self {
        Attribution {
            owner: fields.user_id,
            created_by: fields.created_by,
            updated_by: fields.updated_by,
        }
    }
}

/// Update bodies only carry the modifier; a client-sent owner or creator
/// is ignored
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuditFields {
    pub updated_by: Option<UserId>,
}

impl From<UpdateAuditFields> for Attribution {
    fn from(fields: UpdateAuditFields) -> Self {
        Attribution {
            updated_by: fields.updated_by,
            ..Default::default()
        }
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<CreateProfileRequest> for NewProfile {
    fn from(req: CreateProfileRequest) -> Self {
        NewProfile {
            name: req.name,
            attribution: req.audit.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: ProfileId,
    pub user_id: UserId,
    pub name: String,
    #[serde(flatten)]
    pub audit: AuditEnvelope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.profile_id,
            user_id: profile.user_id,
            name: profile.name.as_str().to_string(),
            audit: profile.audit,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileBody {
    pub message: &'static str,
    pub profile: ProfileResponse,
}

#[derive(Debug, Serialize)]
pub struct ProfilesBody {
    pub message: &'static str,
    pub profiles: Vec<ProfileResponse>,
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(req: CreateCategoryRequest) -> Self {
        NewCategory {
            name: req.name,
            description: req.description,
            attribution: req.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: UpdateAuditFields,
}

impl From<UpdateCategoryRequest> for CategoryUpdate {
    fn from(req: UpdateCategoryRequest) -> Self {
        CategoryUpdate {
            name: req.name,
            description: req.description,
            attribution: req.audit.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: AuditEnvelope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.category_id,
            user_id: category.user_id,
            name: category.name.as_str().to_string(),
            description: category.description.clone(),
            audit: category.audit,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryBody {
    pub message: &'static str,
    pub category: CategoryResponse,
}

#[derive(Debug, Serialize)]
pub struct CategoriesBody {
    pub message: &'static str,
    pub categories: Vec<CategoryResponse>,
}

// ============================================================================
// Transactions
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: CategoryId,
    pub profile_id: Option<ProfileId>,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<CreateTransactionRequest> for NewTransaction {
    fn from(req: CreateTransactionRequest) -> Self {
        NewTransaction {
            amount: req.amount,
            kind: req.kind,
            category_id: req.category_id,
            profile_id: req.profile_id,
            date: req.date,
            note: req.note,
            attribution: req.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub profile_id: Option<ProfileId>,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
    #[serde(flatten)]
    pub audit: UpdateAuditFields,
}

impl From<UpdateTransactionRequest> for TransactionUpdate {
    fn from(req: UpdateTransactionRequest) -> Self {
        TransactionUpdate {
            amount: req.amount,
            kind: req.kind,
            category_id: req.category_id,
            profile_id: req.profile_id,
            date: req.date,
            note: req.note,
            attribution: req.audit.into(),
        }
    }
}

/// `?userId=..&startDate=..&endDate=..`, RFC 3339 timestamps
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub user_id: UserId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: TransactionId,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub profile_id: ProfileId,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub audit: AuditEnvelope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.transaction_id,
            user_id: tx.user_id,
            category_id: tx.category_id,
            profile_id: tx.profile_id,
            amount: tx.amount.value(),
            kind: tx.kind,
            date: tx.date,
            note: tx.note.clone(),
            audit: tx.audit,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionBody {
    pub message: &'static str,
    pub transaction: TransactionResponse,
}

#[derive(Debug, Serialize)]
pub struct TransactionsBody {
    pub message: &'static str,
    pub transactions: Vec<TransactionResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_reads_stamped_fields() {
        let me = UserId::new();
        let category = CategoryId::new();
        let req: CreateTransactionRequest = serde_json::from_value(json!({
            "amount": 50,
            "type": "debit",
            "categoryId": category.to_string(),
            "userId": me.to_string(),
            "createdBy": me.to_string(),
            "updatedBy": me.to_string(),
        }))
        .unwrap();

        let input = NewTransaction::from(req);
        assert_eq!(input.amount, 50.0);
        assert_eq!(input.kind, TransactionType::Debit);
        assert_eq!(input.attribution.owner, Some(me));
        assert_eq!(input.attribution.created_by, Some(me));
        assert_eq!(input.profile_id, None);
    }

    #[test]
    fn test_update_request_ignores_owner_and_creator() {
        let editor = UserId::new();
        let req: UpdateCategoryRequest = serde_json::from_value(json!({
            "name": "Dining",
            "userId": UserId::new().to_string(),
            "createdBy": UserId::new().to_string(),
            "updatedBy": editor.to_string(),
        }))
        .unwrap();

        let update = CategoryUpdate::from(req);
        assert_eq!(update.attribution.owner, None);
        assert_eq!(update.attribution.created_by, None);
        assert_eq!(update.attribution.updated_by, Some(editor));
    }

    #[test]
    fn test_transaction_response_shape() {
        let owner = UserId::new();
        let tx = Transaction::new(
            owner,
            CategoryId::new(),
            ProfileId::new(),
            crate::domain::value_object::Amount::new(9.99).unwrap(),
            TransactionType::Credit,
            None,
            None,
            AuditEnvelope::created(owner),
        );

        let json = serde_json::to_value(TransactionResponse::from(&tx)).unwrap();
        assert_eq!(json["type"], "credit");
        assert_eq!(json["createdBy"], owner.to_string());
        assert_eq!(json["updatedBy"], owner.to_string());
        assert_eq!(json["userId"], owner.to_string());
        assert!(json.get("note").is_none());
    }
}
