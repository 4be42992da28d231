use chrono::{DateTime, Utc};
use kernel::audit::AuditEnvelope;
use kernel::id::{CategoryId, ProfileId, TransactionId, UserId};

use super::Owned;
use crate::domain::value_object::{Amount, TransactionType};

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub profile_id: ProfileId,
    pub amount: Amount,
    pub kind: TransactionType,
    /// When the money moved; defaults to creation time
    pub date: DateTime<Utc>,
    pub note: Option<String>,
    pub audit: AuditEnvelope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated partial update; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub amount: Option<Amount>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub profile_id: Option<ProfileId>,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        category_id: CategoryId,
        profile_id: ProfileId,
        amount: Amount,
        kind: TransactionType,
        date: Option<DateTime<Utc>>,
        note: Option<String>,
        audit: AuditEnvelope,
    ) -> Self {
        let now = Utc::now();
        Self {
            transaction_id: TransactionId::new(),
            user_id,
            category_id,
            profile_id,
            amount,
            kind,
            date: date.unwrap_or(now),
            note,
            audit,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: TransactionChanges, by: UserId) {
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(kind) = changes.kind {
            self.kind = kind;
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(profile_id) = changes.profile_id {
            self.profile_id = profile_id;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(note) = changes.note {
            self.note = Some(note);
        }
        self.audit.touch(by);
        self.updated_at = Utc::now();
    }
}

impl Owned for Transaction {
    fn owner(&self) -> UserId {
        self.user_id
    }

    fn audit(&self) -> &AuditEnvelope {
        &self.audit
    }
}
